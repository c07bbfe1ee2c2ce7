#![allow(dead_code)]
//! Soporte de tests: escribe un juego de artefactos de prueba en disco.

use std::fs;
use std::path::Path;

use flora_core::artefactos::{Arbol, MetadatosCaracteristicas, Nodo, RegresorArtefacto,
                             ARCHIVO_CODIFICADORES, ARCHIVO_METADATOS, ARCHIVO_REGRESOR};

/// Regresor mínimo: un árbol que separa por mes (feature 0).
/// Enero-junio → 110 días; julio-diciembre → 130 días.
pub fn regresor_de_prueba() -> RegresorArtefacto {
    RegresorArtefacto { num_caracteristicas: 15,
                        sesgo_base: 0.0,
                        arboles: vec![Arbol { nodos: vec![Nodo::Rama { caracteristica: 0,
                                                                       umbral: 6.5,
                                                                       izquierda: 1,
                                                                       derecha: 2,
                                                                       faltante_izquierda: true },
                                                          Nodo::Hoja { valor: 110.0 },
                                                          Nodo::Hoja { valor: 130.0 }] }] }
}

pub fn metadatos_de_prueba() -> MetadatosCaracteristicas {
    MetadatosCaracteristicas {
        feature_list: vec!["mes".into(),
                           "dia_anio".into(),
                           "trimestre".into(),
                           "anio".into(),
                           "semana_anio".into(),
                           "mes_sin".into(),
                           "mes_cos".into(),
                           "dia_anio_sin".into(),
                           "dia_anio_cos".into(),
                           "genero_encoded".into(),
                           "especie_encoded".into(),
                           "ubicacion_encoded".into(),
                           "tipo_encoded".into(),
                           "cantidad".into(),
                           "disponible".into()],
        categorical_columns: vec!["genero".into(),
                                  "especie".into(),
                                  "ubicacion".into(),
                                  "tipo".into()],
        input_columns_required: vec!["especie".into(), "fecha_evento".into()],
    }
}

pub fn codificadores_de_prueba() -> serde_json::Value {
    serde_json::json!({
        "genero": ["Cattleya", "Phalaenopsis"],
        "especie": ["amabilis", "maxima"],
        "ubicacion": ["V-0 M-1A P-A", "invernadero"],
        "tipo": ["HYBRID", "SELF", "SIBBLING"]
    })
}

pub fn escribir_artefactos(directorio: &Path) {
    escribir_artefactos_con_metadatos(directorio, &metadatos_de_prueba());
}

pub fn escribir_artefactos_con_metadatos(directorio: &Path,
                                         metadatos: &MetadatosCaracteristicas) {
    fs::create_dir_all(directorio).unwrap();
    fs::write(directorio.join(ARCHIVO_REGRESOR),
              serde_json::to_string_pretty(&regresor_de_prueba()).unwrap()).unwrap();
    fs::write(directorio.join(ARCHIVO_CODIFICADORES),
              serde_json::to_string_pretty(&codificadores_de_prueba()).unwrap()).unwrap();
    fs::write(directorio.join(ARCHIVO_METADATOS),
              serde_json::to_string_pretty(metadatos).unwrap()).unwrap();
}
