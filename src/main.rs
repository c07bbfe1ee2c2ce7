//! Demostración del flujo por etapas: inicial → refinada → validada.
//!
//! La etapa refinada necesita artefactos entrenados; apunte
//! `FLORA_MODELOS_DIR` a un directorio con el juego del dominio
//! (`Polinizacion/regresor.json`, `codificadores.json`,
//! `features_metadata.json`).

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use flora_core::artefactos::{AlmacenArtefactos, DominioPrediccion};
use flora_core::motor::{solicitud_desde_json, MotorPrediccion};

fn main() {
    let _ = dotenvy::dotenv();

    let almacen = match AlmacenArtefactos::desde_entorno(DominioPrediccion::Polinizacion) {
        Ok(almacen) => almacen,
        Err(_) => {
            // Sin FLORA_MODELOS_DIR la heurística sigue funcionando; la
            // refinada devolverá su sobre de error.
            AlmacenArtefactos::nuevo("modelos/Polinizacion")
        }
    };
    let motor = MotorPrediccion::nuevo(Arc::new(almacen));

    println!("== etapa inicial (heurística, sin fecha) ==");
    let solicitud_inicial = solicitud_desde_json(&json!({
        "especie": "Cattleya",
        "clima": "templado",
        "ubicacion": "invernadero"
    })).expect("solicitud de demo válida");
    let inicial = motor.prediccion_inicial(&solicitud_inicial);
    println!("{}", serde_json::to_string_pretty(&inicial).unwrap());

    println!("\n== etapa refinada (modelo, con fecha) ==");
    let solicitud_refinada = solicitud_desde_json(&json!({
        "especie": "Cattleya maxima",
        "genero": "Cattleya",
        "clima": "templado",
        "ubicacion": "invernadero",
        "tipo": "self",
        "cantidad": 2,
        "disponible": 1,
        "fechapol": "2024-01-01"
    })).expect("solicitud de demo válida");
    let refinada = motor.prediccion_refinada(&solicitud_refinada);
    println!("{}", serde_json::to_string_pretty(&refinada).unwrap());

    if let Some(resultado) = refinada.resultado() {
        println!("\n== etapa validada (contra la fecha real) ==");
        let fecha_real = resultado.fecha_estimada
                                  .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        match motor.validar(Some(&refinada), Some(fecha_real)) {
            Ok(validacion) => {
                println!("{}", serde_json::to_string_pretty(&validacion).unwrap())
            }
            Err(e) => eprintln!("validación fallida: {e}"),
        }
    }
}
