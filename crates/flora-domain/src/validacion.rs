//! Resultado de comparar una predicción refinada contra la fecha real.

use serde::{Deserialize, Serialize};

/// Calidad de la predicción según la precisión alcanzada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalidadPrediccion {
    Excelente,
    Buena,
    Aceptable,
    Pobre,
}

impl CalidadPrediccion {
    pub fn desde_precision(precision: f64) -> Self {
        if precision >= 90.0 {
            CalidadPrediccion::Excelente
        } else if precision >= 70.0 {
            CalidadPrediccion::Buena
        } else if precision >= 40.0 {
            CalidadPrediccion::Aceptable
        } else {
            CalidadPrediccion::Pobre
        }
    }
}

/// Hacia dónde cayó la fecha real respecto de la estimada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tendencia {
    Exacta,
    Adelantada,
    Atrasada,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidacionResultado {
    pub precision: f64,
    pub dias_reales: i64,
    pub diferencia_dias: i64,
    pub calidad: CalidadPrediccion,
    pub tendencia: Tendencia,
}
