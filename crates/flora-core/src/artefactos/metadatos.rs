//! Metadatos de features: el contrato con el entrenamiento.
//!
//! Los nombres de campo JSON (`feature_list`, `categorical_columns`,
//! `input_columns_required`) son parte del contrato de archivo y no deben
//! cambiar sin reversionar los artefactos.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadatosCaracteristicas {
    /// Nombres de features en el orden exacto que espera el regresor.
    pub feature_list: Vec<String>,
    /// Subconjunto de columnas que requieren codificación categórica.
    pub categorical_columns: Vec<String>,
    /// Campos de entrada que deben estar presentes y no nulos.
    pub input_columns_required: Vec<String>,
}

impl MetadatosCaracteristicas {
    pub fn esta_vacio(&self) -> bool {
        self.feature_list.is_empty()
    }
}
