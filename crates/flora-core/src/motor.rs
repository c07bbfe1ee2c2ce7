//! Motor de predicción por etapas.
//!
//! Estados: `REQUESTED → INITIAL → REFINED → VALIDATED`, con `ERROR`
//! alcanzable desde cualquiera.
//!
//! - **inicial**: heurística por tabla de referencia; solo necesita
//!   especie/género (clima y ubicación opcionales), sin fecha.
//! - **refinada**: tubería de features + regresor entrenado; requiere el
//!   juego completo de campos incluida la fecha del evento.
//! - **validada**: no predice; compara una refinada previa contra la
//!   fecha real (ver `validacion`).
//!
//! Las etapas inicial y refinada devuelven un sobre (`SalidaPrediccion`)
//! en lugar de propagar errores a través de la frontera de servicio: un
//! fallo viaja como código + confianza 0, de modo que los llamadores por
//! lote o de UI inspeccionan cada ítem de manera uniforme.

use chrono::NaiveDate;
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use flora_domain::{ComparacionInicial, PrediccionResultado, SolicitudPrediccion, TipoPrediccion,
                   ValidacionResultado};

use crate::artefactos::AlmacenArtefactos;
use crate::cache::{self, CachePredicciones};
use crate::caracteristicas;
use crate::config::PoliticaConfianza;
use crate::errors::PrediccionError;
use crate::validacion;

// Banda de la confianza heurística; la etapa inicial nunca alcanza la
// banda del modelo.
const CONFIANZA_INICIAL_MIN: f64 = 15.0;
const CONFIANZA_INICIAL_MAX: f64 = 55.0;

/// Línea base por especie: días hasta culminar y factor climático propio.
const TABLA_ESPECIES: &[(&str, i64, f64)] = &[("cattleya", 120, 1.2),
                                              ("phalaenopsis", 90, 1.1),
                                              ("dendrobium", 100, 1.05),
                                              ("oncidium", 95, 1.05),
                                              ("vanda", 110, 1.15),
                                              ("cymbidium", 150, 1.1),
                                              ("paphiopedilum", 180, 1.2),
                                              ("masdevallia", 130, 1.15),
                                              ("phragmipedium", 150, 1.15),
                                              ("lepanthes", 140, 1.2)];

const TABLA_GENEROS: &[(&str, i64, f64)] = &[("orchidaceae", 100, 1.1), ("orquidea", 100, 1.1)];

const DIAS_POR_DEFECTO: i64 = 60;
const FACTOR_POR_DEFECTO: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NivelCoincidencia {
    Especie,
    Genero,
    PorDefecto,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParametrosBase {
    dias_base: i64,
    factor_clima: f64,
}

fn buscar(nombre: &str, tabla: &[(&str, i64, f64)]) -> Option<ParametrosBase> {
    let limpio = nombre.trim();
    tabla.iter()
         .find(|(clave, _, _)| clave.eq_ignore_ascii_case(limpio))
         .map(|(_, dias, factor)| ParametrosBase { dias_base: *dias, factor_clima: *factor })
}

/// Línea base con respaldo: especie exacta → género → valor global.
fn parametros_referencia(especie: Option<&str>,
                         genero: Option<&str>)
                         -> (ParametrosBase, NivelCoincidencia) {
    if let Some(parametros) = especie.and_then(|e| buscar(e, TABLA_ESPECIES)) {
        return (parametros, NivelCoincidencia::Especie);
    }
    if let Some(parametros) =
        genero.and_then(|g| buscar(g, TABLA_ESPECIES).or_else(|| buscar(g, TABLA_GENEROS)))
    {
        return (parametros, NivelCoincidencia::Genero);
    }
    (ParametrosBase { dias_base: DIAS_POR_DEFECTO, factor_clima: FACTOR_POR_DEFECTO },
     NivelCoincidencia::PorDefecto)
}

fn factor_clima(clima: &str) -> Option<f64> {
    match clima.trim().to_lowercase().as_str() {
        "c" | "calido" | "cálido" | "caliente" => Some(0.8),
        "w" | "frio" | "frío" => Some(1.2),
        "i" | "intermedio" | "templado" => Some(1.0),
        "iw" => Some(1.1),
        "ic" => Some(0.9),
        _ => None,
    }
}

fn factor_ubicacion(ubicacion: &str) -> Option<f64> {
    match ubicacion.trim().to_lowercase().as_str() {
        "laboratorio" => Some(0.9),
        "invernadero" => Some(0.95),
        "vivero" => Some(1.0),
        "finca" | "campo" | "exterior" => Some(1.1),
        _ => None,
    }
}

/// Fallo envuelto para la capa de servicio: código estable, mensaje y
/// confianza cero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FalloPrediccion {
    pub codigo: String,
    pub mensaje: String,
    pub confianza: f64,
}

/// Sobre de salida de las etapas inicial y refinada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SalidaPrediccion {
    Exito(PrediccionResultado),
    Fallo(FalloPrediccion),
}

impl SalidaPrediccion {
    pub fn es_error(&self) -> bool {
        matches!(self, SalidaPrediccion::Fallo(_))
    }

    pub fn confianza(&self) -> f64 {
        match self {
            SalidaPrediccion::Exito(resultado) => resultado.confianza,
            SalidaPrediccion::Fallo(fallo) => fallo.confianza,
        }
    }

    pub fn resultado(&self) -> Option<&PrediccionResultado> {
        match self {
            SalidaPrediccion::Exito(resultado) => Some(resultado),
            SalidaPrediccion::Fallo(_) => None,
        }
    }

    pub fn fallo(&self) -> Option<&FalloPrediccion> {
        match self {
            SalidaPrediccion::Exito(_) => None,
            SalidaPrediccion::Fallo(fallo) => Some(fallo),
        }
    }
}

fn fallo_desde(error: PrediccionError) -> SalidaPrediccion {
    warn!("predicción fallida [{}]: {}", error.codigo(), error);
    SalidaPrediccion::Fallo(FalloPrediccion { codigo: error.codigo().to_string(),
                                              mensaje: error.to_string(),
                                              confianza: 0.0 })
}

pub struct MotorPrediccion {
    almacen: Arc<AlmacenArtefactos>,
    cache: CachePredicciones,
    politica: PoliticaConfianza,
}

impl MotorPrediccion {
    pub fn nuevo(almacen: Arc<AlmacenArtefactos>) -> Self {
        MotorPrediccion::con_politica(almacen, PoliticaConfianza::default())
    }

    pub fn con_politica(almacen: Arc<AlmacenArtefactos>, politica: PoliticaConfianza) -> Self {
        MotorPrediccion { almacen, cache: CachePredicciones::nueva(), politica }
    }

    pub fn politica(&self) -> &PoliticaConfianza {
        &self.politica
    }

    pub fn cache(&self) -> &CachePredicciones {
        &self.cache
    }

    pub fn almacen(&self) -> &AlmacenArtefactos {
        &self.almacen
    }

    /// Etapa inicial: heurística por tabla de referencia, sin fecha ni
    /// modelo. `fecha_estimada` queda en `None`: no hay fecha que la ancle.
    pub fn prediccion_inicial(&self, solicitud: &SolicitudPrediccion) -> SalidaPrediccion {
        match self.inicial_interna(solicitud) {
            Ok(resultado) => SalidaPrediccion::Exito(resultado),
            Err(error) => fallo_desde(error),
        }
    }

    fn inicial_interna(&self,
                       solicitud: &SolicitudPrediccion)
                       -> Result<PrediccionResultado, PrediccionError> {
        let clave = cache::clave_base(solicitud);
        if let Some(previa) = self.cache.get(&clave) {
            info!("cache hit para {}", solicitud.etiqueta());
            return Ok(previa);
        }

        let (parametros, nivel) =
            parametros_referencia(solicitud.especie(), solicitud.genero());

        let mut dias = parametros.dias_base as f64 * parametros.factor_clima;
        let mut confianza = self.politica.base_inicial;
        match nivel {
            NivelCoincidencia::Especie => {}
            NivelCoincidencia::Genero => confianza -= 5.0,
            NivelCoincidencia::PorDefecto => confianza -= 10.0,
        }
        if let Some(factor) = solicitud.clima().and_then(factor_clima) {
            dias *= factor;
            confianza += 5.0;
        }
        if let Some(factor) = solicitud.ubicacion().and_then(factor_ubicacion) {
            dias *= factor;
            confianza += 5.0;
        }
        let dias = (dias.round() as i64).max(1);
        let confianza = confianza.clamp(CONFIANZA_INICIAL_MIN, CONFIANZA_INICIAL_MAX);

        info!("inicial {}: {} días, confianza {:.1}%", solicitud.etiqueta(), dias, confianza);
        let resultado = PrediccionResultado::nueva(TipoPrediccion::Inicial,
                                                   dias,
                                                   None,
                                                   confianza,
                                                   0,
                                                   entrada_eco(solicitud))
            .map_err(|e| PrediccionError::Interno(e.to_string()))?;
        self.cache.set(clave, resultado.clone());
        Ok(resultado)
    }

    /// Etapa refinada: tubería de features + regresor. El estimado crudo se
    /// postprocesa como `max(1, round(crudo))`; la confianza parte de la
    /// base configurada, se penaliza por cada categoría fuera de
    /// vocabulario y se recorta a la banda de la política.
    pub fn prediccion_refinada(&self, solicitud: &SolicitudPrediccion) -> SalidaPrediccion {
        match self.refinada_interna(solicitud) {
            Ok(resultado) => SalidaPrediccion::Exito(resultado),
            Err(error) => fallo_desde(error),
        }
    }

    fn refinada_interna(&self,
                        solicitud: &SolicitudPrediccion)
                        -> Result<PrediccionResultado, PrediccionError> {
        let fecha = solicitud.fecha_evento().ok_or_else(|| {
            PrediccionError::DatosInsuficientes { campos: vec!["fecha_evento".to_string()] }
        })?;

        let clave = cache::clave_cache(solicitud);
        if let Some(previa) = self.cache.get(&clave) {
            if previa.tipo_prediccion == TipoPrediccion::Refinada {
                info!("cache hit (refinada) para {}", solicitud.etiqueta());
                return Ok(previa);
            }
        }

        let contexto = self.almacen.contexto()?;
        let vector = caracteristicas::construir_vector(&contexto, solicitud)?;
        let crudo = contexto.regresor.predecir(&vector.valores)?;
        let dias = (crudo.round() as i64).max(1);

        let confianza = self.politica.ajustar(
            self.politica.base_refinada
            - self.politica.penalizacion_categoria * vector.categorias_nuevas as f64,
        );

        info!("refinada {}: crudo {:.2} → {} días, {} categorías nuevas, confianza {:.1}%",
              solicitud.etiqueta(), crudo, dias, vector.categorias_nuevas, confianza);

        let mut resultado = PrediccionResultado::nueva(TipoPrediccion::Refinada,
                                                       dias,
                                                       Some(fecha),
                                                       confianza,
                                                       vector.categorias_nuevas,
                                                       entrada_eco(solicitud))
            .map_err(|e| PrediccionError::Interno(e.to_string()))?;

        let clave_base = cache::clave_base(solicitud);
        if let Some(inicial) = self.cache.get(&clave_base) {
            if inicial.tipo_prediccion == TipoPrediccion::Inicial {
                resultado = resultado.con_comparacion(ComparacionInicial {
                    dias_inicial: inicial.dias_estimados,
                    delta_dias: dias - inicial.dias_estimados,
                });
            }
        }

        // La refinada sustituye a la inicial también bajo la clave base:
        // los llamadores prefieren la última etapa disponible.
        self.cache.set(clave, resultado.clone());
        self.cache.set(clave_base, resultado.clone());
        Ok(resultado)
    }

    /// Predicción por lote: cada solicitud se procesa de forma aislada; el
    /// fallo de un ítem nunca aborta al resto. Las solicitudes con fecha
    /// van a la etapa refinada, el resto a la inicial.
    pub fn predecir_lote(&self, solicitudes: &[SolicitudPrediccion]) -> Vec<SalidaPrediccion> {
        solicitudes.par_iter()
                   .map(|solicitud| {
                       if solicitud.fecha_evento().is_some() {
                           self.prediccion_refinada(solicitud)
                       } else {
                           self.prediccion_inicial(solicitud)
                       }
                   })
                   .collect()
    }

    /// Variante por lote sobre la forma plana clave/valor de la capa de
    /// servicio.
    pub fn predecir_lote_json(&self, valores: &[Value]) -> Vec<SalidaPrediccion> {
        valores.par_iter()
               .map(|valor| match solicitud_desde_json(valor) {
                   Ok(solicitud) => {
                       if solicitud.fecha_evento().is_some() {
                           self.prediccion_refinada(&solicitud)
                       } else {
                           self.prediccion_inicial(&solicitud)
                       }
                   }
                   Err(error) => fallo_desde(error),
               })
               .collect()
    }

    /// Etapa validada. A diferencia de las anteriores siempre propaga el
    /// error: no existe validación degradada.
    pub fn validar(&self,
                   original: Option<&SalidaPrediccion>,
                   fecha_real: Option<NaiveDate>)
                   -> Result<ValidacionResultado, PrediccionError> {
        let salida = original.ok_or(PrediccionError::PrediccionOriginalFaltante)?;
        let resultado = salida.resultado().ok_or(PrediccionError::PrediccionOriginalFaltante)?;
        let fecha = fecha_real.ok_or(PrediccionError::FechaRealFaltante)?;
        validacion::validar_prediccion(resultado, fecha, &self.politica)
    }
}

fn entrada_eco(solicitud: &SolicitudPrediccion) -> Value {
    serde_json::to_value(solicitud).unwrap_or(Value::Null)
}

fn cadena(valor: &Value, campo: &str) -> Option<String> {
    valor.get(campo).and_then(Value::as_str).map(str::to_string)
}

fn entero(valor: &Value, campo: &str) -> Option<i64> {
    match valor.get(campo) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Construye una solicitud desde la forma plana clave/valor del servicio.
/// La ausencia de especie y género es `DatosInsuficientes`; una fecha
/// textual que no parsea como `YYYY-MM-DD` es `FechaInvalida`.
pub fn solicitud_desde_json(valor: &Value) -> Result<SolicitudPrediccion, PrediccionError> {
    let especie = cadena(valor, "especie");
    let genero = cadena(valor, "genero");
    let mut solicitud = SolicitudPrediccion::nueva(especie.as_deref(), genero.as_deref())
        .map_err(|_| PrediccionError::DatosInsuficientes {
            campos: vec!["especie".to_string(), "genero".to_string()],
        })?;

    if let Some(clima) = cadena(valor, "clima") {
        solicitud = solicitud.con_clima(&clima);
    }
    if let Some(ubicacion) = cadena(valor, "ubicacion") {
        solicitud = solicitud.con_ubicacion(&ubicacion);
    }
    if let Some(tipo) = cadena(valor, "tipo_polinizacion").or_else(|| cadena(valor, "tipo")) {
        solicitud = solicitud.con_tipo_polinizacion(&tipo);
    }
    if let Some(cantidad) = entero(valor, "cantidad") {
        solicitud = solicitud.con_cantidad(cantidad);
    }
    if let Some(disponible) = entero(valor, "disponible") {
        solicitud = solicitud.con_disponible(disponible);
    }
    for campo_fecha in ["fecha_evento", "fechapol", "fecha_siembra"] {
        if let Some(texto) = cadena(valor, campo_fecha) {
            let fecha = NaiveDate::parse_from_str(texto.trim(), "%Y-%m-%d").map_err(|_| {
                PrediccionError::FechaInvalida(format!(
                    "'{texto}' no es una fecha YYYY-MM-DD válida"
                ))
            })?;
            solicitud = solicitud.con_fecha_evento(fecha);
            break;
        }
    }
    if let Some(extras) = valor.get("extras").and_then(Value::as_object) {
        for (clave, extra) in extras {
            if let Some(texto) = extra.as_str() {
                solicitud = solicitud.con_extra(clave, texto);
            }
        }
    }
    Ok(solicitud)
}
