//! Validación de una predicción refinada contra la fecha real observada.
//!
//! Función pura, sin estado ni efectos: llamarla dos veces con los mismos
//! insumos produce el mismo reporte. A diferencia de las etapas inicial y
//! refinada, aquí un fallo siempre se propaga como error: no existe un
//! reporte de validación degradado que tenga sentido.

use chrono::NaiveDate;

use flora_domain::{CalidadPrediccion, PrediccionResultado, Tendencia, TipoPrediccion,
                   ValidacionResultado};

use crate::config::PoliticaConfianza;
use crate::errors::PrediccionError;

/// Compara la predicción refinada con la fecha real de culminación.
///
/// `precision = max(0, 100 − diferencia_dias · factor)`: 100 con cero días
/// de diferencia, degradando linealmente y nunca negativa.
pub fn validar_prediccion(original: &PrediccionResultado,
                          fecha_real: NaiveDate,
                          politica: &PoliticaConfianza)
                          -> Result<ValidacionResultado, PrediccionError> {
    if original.tipo_prediccion != TipoPrediccion::Refinada {
        return Err(PrediccionError::PrediccionOriginalFaltante);
    }
    let (fecha_origen, fecha_estimada) = match (original.fecha_origen, original.fecha_estimada) {
        (Some(origen), Some(estimada)) => (origen, estimada),
        _ => return Err(PrediccionError::PrediccionOriginalFaltante),
    };
    if fecha_real <= fecha_origen {
        return Err(PrediccionError::FechaInvalida(format!(
            "la fecha real ({fecha_real}) debe ser posterior a la fecha de origen ({fecha_origen})"
        )));
    }

    let dias_reales = (fecha_real - fecha_origen).num_days();
    let diferencia_dias = (fecha_estimada - fecha_real).num_days().abs();
    let precision = (100.0 - diferencia_dias as f64 * politica.factor_precision).max(0.0);
    let tendencia = if diferencia_dias == 0 {
        Tendencia::Exacta
    } else if fecha_real < fecha_estimada {
        Tendencia::Adelantada
    } else {
        Tendencia::Atrasada
    };

    Ok(ValidacionResultado { precision,
                             dias_reales,
                             diferencia_dias,
                             calidad: CalidadPrediccion::desde_precision(precision),
                             tendencia })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refinada() -> PrediccionResultado {
        PrediccionResultado::nueva(TipoPrediccion::Refinada,
                                   120,
                                   NaiveDate::from_ymd_opt(2024, 1, 1),
                                   85.0,
                                   0,
                                   json!({}))
            .unwrap()
        // fecha_estimada: 2024-04-30
    }

    #[test]
    fn coincidencia_exacta_da_cien() {
        let politica = PoliticaConfianza::default();
        let v = validar_prediccion(&refinada(),
                                   NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
                                   &politica).unwrap();
        assert_eq!(v.precision, 100.0);
        assert_eq!(v.diferencia_dias, 0);
        assert_eq!(v.dias_reales, 120);
        assert_eq!(v.calidad, CalidadPrediccion::Excelente);
        assert_eq!(v.tendencia, Tendencia::Exacta);
    }

    #[test]
    fn precision_decrece_y_nunca_es_negativa() {
        let politica = PoliticaConfianza::default();
        let con_diferencia = |dias: i64| {
            let fecha = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
                        + chrono::Duration::days(dias);
            validar_prediccion(&refinada(), fecha, &politica).unwrap()
        };
        let v1 = con_diferencia(1);
        let v10 = con_diferencia(10);
        let v80 = con_diferencia(80);
        assert!(v1.precision > v10.precision);
        assert!(v10.precision > v80.precision);
        assert_eq!(v1.precision, 98.0);
        assert_eq!(v1.calidad, CalidadPrediccion::Excelente);
        assert_eq!(v80.precision, 0.0);
        assert_eq!(v80.calidad, CalidadPrediccion::Pobre);
        assert_eq!(v80.tendencia, Tendencia::Atrasada);
    }

    #[test]
    fn maduracion_anticipada_es_adelantada() {
        let politica = PoliticaConfianza::default();
        let v = validar_prediccion(&refinada(),
                                   NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
                                   &politica).unwrap();
        assert_eq!(v.tendencia, Tendencia::Adelantada);
        assert_eq!(v.diferencia_dias, 10);
    }

    #[test]
    fn una_inicial_no_se_puede_validar() {
        let politica = PoliticaConfianza::default();
        let inicial = PrediccionResultado::nueva(TipoPrediccion::Inicial, 60, None, 40.0, 0,
                                                 json!({})).unwrap();
        assert_eq!(validar_prediccion(&inicial,
                                      NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                                      &politica),
                   Err(PrediccionError::PrediccionOriginalFaltante));
    }

    #[test]
    fn fecha_real_anterior_al_origen_se_rechaza() {
        let politica = PoliticaConfianza::default();
        let resultado = validar_prediccion(&refinada(),
                                           NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
                                           &politica);
        assert!(matches!(resultado, Err(PrediccionError::FechaInvalida(_))));
    }

    #[test]
    fn validar_es_idempotente() {
        let politica = PoliticaConfianza::default();
        let original = refinada();
        let fecha = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        let a = validar_prediccion(&original, fecha, &politica).unwrap();
        let b = validar_prediccion(&original, fecha, &politica).unwrap();
        assert_eq!(a, b);
    }
}
