//! Errores tipados del núcleo de predicción.
//!
//! Cada variante expone un `codigo()` estable que viaja en el sobre de
//! salida (`FalloPrediccion`) hacia la capa de servicio. Las categorías
//! fuera de vocabulario NO son un error: degradan la confianza.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone, Serialize, Deserialize)]
pub enum PrediccionError {
    #[error("artefacto no encontrado: {ruta}")]
    ArtefactoFaltante { ruta: String },
    #[error("artefacto corrupto ({ruta}): {detalle}")]
    ArtefactoCorrupto { ruta: String, detalle: String },
    #[error("campos requeridos faltantes: {}", .campos.join(", "))]
    DatosInsuficientes { campos: Vec<String> },
    #[error("formato de fecha inválido: {0}")]
    FechaInvalida(String),
    #[error("se requiere la predicción refinada original, sin errores")]
    PrediccionOriginalFaltante,
    #[error("se requiere la fecha real observada")]
    FechaRealFaltante,
    #[error("interno: {0}")]
    Interno(String),
}

impl PrediccionError {
    pub fn codigo(&self) -> &'static str {
        match self {
            PrediccionError::ArtefactoFaltante { .. } => "MODELO_NO_ENCONTRADO",
            PrediccionError::ArtefactoCorrupto { .. } => "MODELO_CORRUPTO",
            PrediccionError::DatosInsuficientes { .. } => "DATOS_INSUFICIENTES",
            PrediccionError::FechaInvalida(_) => "FECHA_INVALIDA",
            PrediccionError::PrediccionOriginalFaltante => "PREDICCION_ORIGINAL_FALTANTE",
            PrediccionError::FechaRealFaltante => "FECHA_REAL_FALTANTE",
            PrediccionError::Interno(_) => "ERROR_INTERNO",
        }
    }
}
