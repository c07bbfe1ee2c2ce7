//! Tubería de features: de una solicitud a un vector numérico alineado.
//!
//! Los pares seno/coseno existen para que diciembre y enero queden
//! numéricamente adyacentes en lugar de máximamente distantes.

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use std::collections::HashMap;
use std::f64::consts::PI;

use flora_domain::SolicitudPrediccion;

use crate::artefactos::ContextoModelo;
use crate::errors::PrediccionError;

/// Features derivadas de la fecha del evento.
#[derive(Debug, Clone, PartialEq)]
pub struct CaracteristicasTemporales {
    pub mes: u32,
    pub dia_anio: u32,
    pub trimestre: u32,
    pub anio: i32,
    pub semana_anio: u32,
    pub mes_sin: f64,
    pub mes_cos: f64,
    pub dia_anio_sin: f64,
    pub dia_anio_cos: f64,
}

impl CaracteristicasTemporales {
    pub fn desde_fecha(fecha: NaiveDate) -> Self {
        let mes = fecha.month();
        let dia_anio = fecha.ordinal();
        CaracteristicasTemporales { mes,
                                    dia_anio,
                                    trimestre: (mes - 1) / 3 + 1,
                                    anio: fecha.year(),
                                    semana_anio: fecha.iso_week().week(),
                                    mes_sin: (2.0 * PI * mes as f64 / 12.0).sin(),
                                    mes_cos: (2.0 * PI * mes as f64 / 12.0).cos(),
                                    dia_anio_sin: (2.0 * PI * dia_anio as f64 / 365.0).sin(),
                                    dia_anio_cos: (2.0 * PI * dia_anio as f64 / 365.0).cos() }
    }

    fn volcar_en(&self, destino: &mut HashMap<String, f64>) {
        destino.insert("mes".to_string(), self.mes as f64);
        destino.insert("dia_anio".to_string(), self.dia_anio as f64);
        destino.insert("trimestre".to_string(), self.trimestre as f64);
        destino.insert("anio".to_string(), self.anio as f64);
        destino.insert("semana_anio".to_string(), self.semana_anio as f64);
        destino.insert("mes_sin".to_string(), self.mes_sin);
        destino.insert("mes_cos".to_string(), self.mes_cos);
        destino.insert("dia_anio_sin".to_string(), self.dia_anio_sin);
        destino.insert("dia_anio_cos".to_string(), self.dia_anio_cos);
    }
}

/// Vector listo para el regresor, más el contador de categorías nuevas que
/// alimenta la penalización de confianza.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorCaracteristicas {
    pub valores: Vec<f64>,
    pub categorias_nuevas: u32,
}

/// Construye el vector en el orden exacto de `feature_list`.
///
/// Una categoría fuera de vocabulario nunca es error: emite el código
/// reservado `cardinalidad()` e incrementa el contador. Un nombre de
/// `feature_list` que los pasos no produjeron sí lo es: inconsistencia
/// interna entre artefactos y tubería.
pub fn construir_vector(contexto: &ContextoModelo,
                        solicitud: &SolicitudPrediccion)
                        -> Result<VectorCaracteristicas, PrediccionError> {
    validar_requeridos(contexto, solicitud)?;

    let fecha = solicitud.fecha_evento().ok_or_else(|| PrediccionError::DatosInsuficientes {
        campos: vec!["fecha_evento".to_string()],
    })?;

    let mut producidas: HashMap<String, f64> = HashMap::new();
    CaracteristicasTemporales::desde_fecha(fecha).volcar_en(&mut producidas);

    let mut categorias_nuevas = 0u32;
    for columna in &contexto.metadatos.categorical_columns {
        let codificador = contexto.codificador(columna).ok_or_else(|| {
            PrediccionError::Interno(format!("no hay codificador para la columna '{columna}'"))
        })?;
        let valor = solicitud.campo(columna).unwrap_or_default();
        let codigo = match codificador.codificar(&valor) {
            Some(codigo) => {
                debug!("{columna}='{valor}' → {codigo}");
                codigo
            }
            None => {
                categorias_nuevas += 1;
                let respaldo = codificador.cardinalidad();
                warn!("categoría nueva en '{columna}': '{valor}' → respaldo {respaldo}");
                respaldo
            }
        };
        producidas.insert(format!("{columna}_encoded"), codigo as f64);
    }

    producidas.insert("cantidad".to_string(), solicitud.cantidad().unwrap_or(0) as f64);
    producidas.insert("disponible".to_string(), solicitud.disponible().unwrap_or(0) as f64);

    let mut valores = Vec::with_capacity(contexto.metadatos.feature_list.len());
    for nombre in &contexto.metadatos.feature_list {
        let valor = producidas.get(nombre).copied().ok_or_else(|| {
            PrediccionError::Interno(format!("la tubería no produjo la feature '{nombre}'"))
        })?;
        valores.push(valor);
    }

    Ok(VectorCaracteristicas { valores, categorias_nuevas })
}

fn validar_requeridos(contexto: &ContextoModelo,
                      solicitud: &SolicitudPrediccion)
                      -> Result<(), PrediccionError> {
    let faltantes: Vec<String> = contexto.metadatos
                                         .input_columns_required
                                         .iter()
                                         .filter(|nombre| {
                                             solicitud.campo(nombre.as_str())
                                                      .map(|v| v.trim().is_empty())
                                                      .unwrap_or(true)
                                         })
                                         .cloned()
                                         .collect();
    if faltantes.is_empty() {
        Ok(())
    } else {
        Err(PrediccionError::DatosInsuficientes { campos: faltantes })
    }
}
