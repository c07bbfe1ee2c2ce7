//! Resultado de una predicción (etapa inicial o refinada).
//!
//! Invariantes, garantizadas por el constructor:
//! - `dias_estimados >= 1`: un proceso biológico no completa en cero días.
//! - `fecha_estimada == fecha_origen + dias_estimados` siempre que exista
//!   `fecha_origen`; sin fecha de origen no hay fecha estimada.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::DomainError;

/// Etapa del ciclo de vida de la predicción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoPrediccion {
    Inicial,
    Refinada,
}

/// Nivel textual de confianza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NivelConfianza {
    Alta,
    Media,
    Baja,
}

impl NivelConfianza {
    pub fn desde_confianza(confianza: f64) -> Self {
        if confianza >= 85.0 {
            NivelConfianza::Alta
        } else if confianza >= 70.0 {
            NivelConfianza::Media
        } else {
            NivelConfianza::Baja
        }
    }
}

/// Diferencia en días contra la predicción inicial que quedó en cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparacionInicial {
    pub dias_inicial: i64,
    pub delta_dias: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrediccionResultado {
    pub id: Uuid,
    pub tipo_prediccion: TipoPrediccion,
    pub dias_estimados: i64,
    pub fecha_origen: Option<NaiveDate>,
    pub fecha_estimada: Option<NaiveDate>,
    pub confianza: f64,
    pub nivel_confianza: NivelConfianza,
    pub categorias_nuevas: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparacion_con_inicial: Option<ComparacionInicial>,
    pub entrada: Value,
    pub creado_en: NaiveDateTime,
}

impl PrediccionResultado {
    pub fn nueva(tipo_prediccion: TipoPrediccion,
                 dias_estimados: i64,
                 fecha_origen: Option<NaiveDate>,
                 confianza: f64,
                 categorias_nuevas: u32,
                 entrada: Value)
                 -> Result<Self, DomainError> {
        if dias_estimados < 1 {
            return Err(DomainError::Validacion(format!(
                "dias_estimados debe ser >= 1, llegó {dias_estimados}"
            )));
        }
        if !(0.0..=100.0).contains(&confianza) {
            return Err(DomainError::Validacion(format!(
                "confianza fuera de rango [0, 100]: {confianza}"
            )));
        }
        let fecha_estimada = fecha_origen.map(|origen| origen + Duration::days(dias_estimados));
        Ok(PrediccionResultado { id: Uuid::new_v4(),
                                 tipo_prediccion,
                                 dias_estimados,
                                 fecha_origen,
                                 fecha_estimada,
                                 confianza,
                                 nivel_confianza: NivelConfianza::desde_confianza(confianza),
                                 categorias_nuevas,
                                 comparacion_con_inicial: None,
                                 entrada,
                                 creado_en: Utc::now().naive_utc() })
    }

    pub fn con_comparacion(mut self, comparacion: ComparacionInicial) -> Self {
        self.comparacion_con_inicial = Some(comparacion);
        self
    }
}
