use chrono::NaiveDate;
use flora_domain::{NivelConfianza, PrediccionResultado, SolicitudPrediccion, TipoPrediccion};
use serde_json::json;

#[test]
fn test_solicitud_normaliza_al_construir() {
    let solicitud = SolicitudPrediccion::nueva(Some("Cattleya maxima"), Some("Cattleya"))
        .unwrap()
        .con_tipo_polinizacion("hibrido")
        .con_ubicacion("V-0 - M-1A - P-0");
    assert_eq!(solicitud.especie(), Some("maxima"));
    assert_eq!(solicitud.tipo_polinizacion(), Some("HYBRID"));
    assert_eq!(solicitud.ubicacion(), Some("V-0 M-1A P-A"));
}

#[test]
fn test_solicitud_campo_por_nombre_de_columna() {
    let fecha = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let solicitud = SolicitudPrediccion::nueva(Some("maxima"), Some("Cattleya"))
        .unwrap()
        .con_clima("templado")
        .con_cantidad(3)
        .con_fecha_evento(fecha)
        .con_extra("responsable", "ADMIN");
    assert_eq!(solicitud.campo("especie"), Some("maxima".to_string()));
    assert_eq!(solicitud.campo("clima"), Some("templado".to_string()));
    assert_eq!(solicitud.campo("cantidad"), Some("3".to_string()));
    assert_eq!(solicitud.campo("fechapol"), Some("2024-01-01".to_string()));
    assert_eq!(solicitud.campo("responsable"), Some("ADMIN".to_string()));
    assert_eq!(solicitud.campo("disponible"), None);
}

#[test]
fn test_solicitud_igualdad_tras_misma_normalizacion() {
    let a = SolicitudPrediccion::nueva(Some(" Cattleya maxima "), Some("Cattleya")).unwrap();
    let b = SolicitudPrediccion::nueva(Some("maxima"), Some("Cattleya")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_resultado_serializa_etiquetas_en_minuscula() {
    let resultado =
        PrediccionResultado::nueva(TipoPrediccion::Inicial, 60, None, 40.0, 0, json!({}))
            .unwrap();
    let valor = serde_json::to_value(&resultado).unwrap();
    assert_eq!(valor["tipo_prediccion"], json!("inicial"));
    assert_eq!(valor["nivel_confianza"], json!("baja"));
    assert_eq!(valor["fecha_estimada"], json!(null));
}

#[test]
fn test_resultado_refinado_serializa_fechas_iso() {
    let origen = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let resultado = PrediccionResultado::nueva(TipoPrediccion::Refinada,
                                               120,
                                               Some(origen),
                                               85.0,
                                               0,
                                               json!({"especie": "maxima"}))
        .unwrap();
    assert_eq!(resultado.nivel_confianza, NivelConfianza::Alta);
    let valor = serde_json::to_value(&resultado).unwrap();
    assert_eq!(valor["fecha_origen"], json!("2024-01-01"));
    assert_eq!(valor["fecha_estimada"], json!("2024-04-30"));
    assert_eq!(valor["tipo_prediccion"], json!("refinada"));
}
