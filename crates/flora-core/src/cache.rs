//! Cache de resultados de predicción.
//!
//! La clave es un hash estable sobre los campos normalizados (minúsculas,
//! sin espacios sobrantes) que influyen en el resultado; el orden de los
//! campos nunca cambia la clave. La expiración (TTL) es política externa:
//! aquí solo viven la derivación de clave y la semántica get/set.

use dashmap::DashMap;
use serde_json::{json, Map, Value};

use flora_domain::{PrediccionResultado, SolicitudPrediccion};

use crate::hashing::hash_valor;

const PREFIJO_CLAVE: &str = "prediccion";

fn normalizar(valor: &str) -> String {
    valor.trim().to_lowercase()
}

fn insertar_opcional(mapa: &mut Map<String, Value>, clave: &str, valor: Option<&str>) {
    if let Some(v) = valor {
        mapa.insert(clave.to_string(), json!(normalizar(v)));
    }
}

fn mapa_base(solicitud: &SolicitudPrediccion) -> Map<String, Value> {
    let mut mapa = Map::new();
    insertar_opcional(&mut mapa, "especie", solicitud.especie());
    insertar_opcional(&mut mapa, "genero", solicitud.genero());
    insertar_opcional(&mut mapa, "clima", solicitud.clima());
    insertar_opcional(&mut mapa, "ubicacion", solicitud.ubicacion());
    for (clave, valor) in solicitud.extras() {
        mapa.insert(format!("extra_{}", normalizar(clave)), json!(normalizar(valor)));
    }
    mapa
}

/// Clave de la etapa inicial: especie, clima, ubicación y extras.
pub fn clave_base(solicitud: &SolicitudPrediccion) -> String {
    format!("{}_{}", PREFIJO_CLAVE, hash_valor(&Value::Object(mapa_base(solicitud))))
}

/// Clave completa: añade los campos que solo participan en la etapa
/// refinada (tipo, cantidad, disponibilidad, fecha del evento).
pub fn clave_cache(solicitud: &SolicitudPrediccion) -> String {
    let mut mapa = mapa_base(solicitud);
    insertar_opcional(&mut mapa, "tipo_polinizacion", solicitud.tipo_polinizacion());
    if let Some(cantidad) = solicitud.cantidad() {
        mapa.insert("cantidad".to_string(), json!(cantidad));
    }
    if let Some(disponible) = solicitud.disponible() {
        mapa.insert("disponible".to_string(), json!(disponible));
    }
    if let Some(fecha) = solicitud.fecha_evento() {
        mapa.insert("fecha_evento".to_string(), json!(fecha.to_string()));
    }
    format!("{}_{}", PREFIJO_CLAVE, hash_valor(&Value::Object(mapa)))
}

/// Memoización de resultados; escrituras concurrentes sobre la misma clave
/// resuelven last-writer-wins.
#[derive(Debug, Default)]
pub struct CachePredicciones {
    entradas: DashMap<String, PrediccionResultado>,
}

impl CachePredicciones {
    pub fn nueva() -> Self {
        CachePredicciones::default()
    }

    pub fn get(&self, clave: &str) -> Option<PrediccionResultado> {
        self.entradas.get(clave).map(|entrada| entrada.value().clone())
    }

    /// Almacena incondicionalmente, sobrescribiendo cualquier entrada previa.
    pub fn set(&self, clave: String, resultado: PrediccionResultado) {
        self.entradas.insert(clave, resultado);
    }

    pub fn invalidar(&self, clave: &str) -> bool {
        self.entradas.remove(clave).is_some()
    }

    pub fn limpiar(&self) {
        self.entradas.clear();
    }

    pub fn len(&self) -> usize {
        self.entradas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entradas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solicitud() -> SolicitudPrediccion {
        SolicitudPrediccion::nueva(Some("Cattleya"), None).unwrap()
                                                          .con_clima("templado")
                                                          .con_ubicacion("invernadero")
    }

    #[test]
    fn misma_entrada_misma_clave() {
        assert_eq!(clave_base(&solicitud()), clave_base(&solicitud()));
    }

    #[test]
    fn la_clave_ignora_mayusculas_y_espacios() {
        let a = SolicitudPrediccion::nueva(Some("Cattleya"), None).unwrap()
                                                                  .con_clima("Templado")
                                                                  .con_ubicacion(" invernadero ");
        assert_eq!(clave_base(&a), clave_base(&solicitud()));
    }

    #[test]
    fn entradas_distintas_claves_distintas() {
        let otra = SolicitudPrediccion::nueva(Some("Phalaenopsis"), None).unwrap()
                                                                         .con_clima("templado")
                                                                         .con_ubicacion("invernadero");
        assert_ne!(clave_base(&solicitud()), clave_base(&otra));
    }

    #[test]
    fn los_extras_participan_en_la_clave() {
        let con_extra = solicitud().con_extra("responsable", "admin");
        let con_otro = solicitud().con_extra("responsable", "laboratorista");
        assert_ne!(clave_base(&con_extra), clave_base(&con_otro));
        assert_ne!(clave_base(&con_extra), clave_base(&solicitud()));
    }

    #[test]
    fn set_sobrescribe() {
        use flora_domain::TipoPrediccion;
        let cache = CachePredicciones::nueva();
        let r1 = PrediccionResultado::nueva(TipoPrediccion::Inicial, 60, None, 40.0, 0,
                                            serde_json::json!({})).unwrap();
        let r2 = PrediccionResultado::nueva(TipoPrediccion::Inicial, 90, None, 40.0, 0,
                                            serde_json::json!({})).unwrap();
        cache.set("k".to_string(), r1);
        cache.set("k".to_string(), r2.clone());
        assert_eq!(cache.get("k"), Some(r2));
        assert!(cache.invalidar("k"));
        assert!(cache.get("k").is_none());
    }
}
