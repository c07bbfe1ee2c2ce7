use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use flora_core::artefactos::{AlmacenArtefactos, DominioPrediccion};
use flora_core::motor::{solicitud_desde_json, MotorPrediccion};

fn main() {
    // Cargar .env si existe para obtener FLORA_MODELOS_DIR
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        uso_y_salir();
    }
    match args[1].as_str() {
        "predecir" => comando_predecir(&args[2..]),
        "validar" => comando_validar(&args[2..]),
        "info" => comando_info(&args[2..]),
        _ => uso_y_salir(),
    }
}

fn uso_y_salir() -> ! {
    eprintln!("uso: flora-cli predecir --especie <NOMBRE> [--genero G] [--clima C] \
               [--ubicacion U] [--tipo T] [--cantidad N] [--disponible 0|1] \
               [--fecha YYYY-MM-DD] [--dominio polinizacion|germinacion] [--modelos DIR]");
    eprintln!("       flora-cli validar --origen YYYY-MM-DD --dias N --fecha-real YYYY-MM-DD");
    eprintln!("       flora-cli info [--dominio polinizacion|germinacion] [--modelos DIR]");
    std::process::exit(2);
}

fn leer_opciones(args: &[String]) -> Map<String, Value> {
    let mut opciones = Map::new();
    let mut i = 0;
    while i < args.len() {
        if let Some(nombre) = args[i].strip_prefix("--") {
            i += 1;
            if i < args.len() {
                opciones.insert(nombre.to_string(), json!(args[i].clone()));
            }
        }
        i += 1;
    }
    opciones
}

fn dominio_de(opciones: &Map<String, Value>) -> DominioPrediccion {
    match opciones.get("dominio").and_then(Value::as_str) {
        Some("germinacion") => DominioPrediccion::Germinacion,
        _ => DominioPrediccion::Polinizacion,
    }
}

fn almacen_de(opciones: &Map<String, Value>) -> AlmacenArtefactos {
    let dominio = dominio_de(opciones);
    match opciones.get("modelos").and_then(Value::as_str) {
        Some(dir) => AlmacenArtefactos::para_dominio(dir, dominio),
        None => match AlmacenArtefactos::desde_entorno(dominio) {
            Ok(almacen) => almacen,
            Err(e) => {
                eprintln!("[flora-cli] {e}");
                std::process::exit(3);
            }
        },
    }
}

fn comando_predecir(args: &[String]) {
    let mut opciones = leer_opciones(args);
    // --tipo y --fecha del CLI usan los nombres del contrato plano
    if let Some(fecha) = opciones.remove("fecha") {
        opciones.insert("fecha_evento".to_string(), fecha);
    }
    let almacen = almacen_de(&opciones);
    let motor = MotorPrediccion::nuevo(Arc::new(almacen));

    let solicitud = match solicitud_desde_json(&Value::Object(opciones.clone())) {
        Ok(solicitud) => solicitud,
        Err(e) => {
            eprintln!("[flora-cli] solicitud inválida: {e}");
            std::process::exit(4);
        }
    };

    let salida = if solicitud.fecha_evento().is_some() {
        motor.prediccion_refinada(&solicitud)
    } else {
        motor.prediccion_inicial(&solicitud)
    };
    println!("{}", serde_json::to_string_pretty(&salida).unwrap());
    if salida.es_error() {
        std::process::exit(1);
    }
}

fn comando_validar(args: &[String]) {
    let opciones = leer_opciones(args);
    let leer_fecha = |campo: &str| -> NaiveDate {
        match opciones.get(campo)
                      .and_then(Value::as_str)
                      .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
        {
            Some(fecha) => fecha,
            None => {
                eprintln!("[flora-cli] falta --{campo} en formato YYYY-MM-DD");
                std::process::exit(4);
            }
        }
    };
    let origen = leer_fecha("origen");
    let fecha_real = leer_fecha("fecha-real");
    let dias: i64 = match opciones.get("dias").and_then(Value::as_str).and_then(|v| v.parse().ok())
    {
        Some(dias) => dias,
        None => {
            eprintln!("[flora-cli] falta --dias");
            std::process::exit(4);
        }
    };

    use flora_core::config::PoliticaConfianza;
    use flora_domain::{PrediccionResultado, TipoPrediccion};
    let original = match PrediccionResultado::nueva(TipoPrediccion::Refinada,
                                                    dias,
                                                    Some(origen),
                                                    PoliticaConfianza::default().base_refinada,
                                                    0,
                                                    Value::Null)
    {
        Ok(original) => original,
        Err(e) => {
            eprintln!("[flora-cli] {e}");
            std::process::exit(4);
        }
    };

    match flora_core::validar_prediccion(&original, fecha_real, &PoliticaConfianza::from_env()) {
        Ok(validacion) => println!("{}", serde_json::to_string_pretty(&validacion).unwrap()),
        Err(e) => {
            eprintln!("[flora-cli] validación fallida: {e}");
            std::process::exit(1);
        }
    }
}

fn comando_info(args: &[String]) {
    let opciones = leer_opciones(args);
    let almacen = almacen_de(&opciones);
    if let Err(e) = almacen.inicializar() {
        eprintln!("[flora-cli] {e}");
        std::process::exit(1);
    }
    println!("{}", serde_json::to_string_pretty(&almacen.info_modelo()).unwrap());
}
