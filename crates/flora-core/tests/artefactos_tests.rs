mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use flora_core::artefactos::{AlmacenArtefactos, DominioPrediccion, ARCHIVO_CODIFICADORES,
                             ARCHIVO_REGRESOR};
use flora_core::errors::PrediccionError;

#[test]
fn carga_exitosa_y_solo_una_vez() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());

    let almacen = AlmacenArtefactos::nuevo(dir.path());
    assert!(!almacen.esta_cargado());

    // La primera llamada carga; la segunda reporta ya-inicializado.
    assert_eq!(almacen.inicializar().unwrap(), true);
    assert!(almacen.esta_cargado());
    assert_eq!(almacen.inicializar().unwrap(), false);

    let a = almacen.contexto().unwrap();
    let b = almacen.contexto().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.metadatos.feature_list.len(), 15);
}

#[test]
fn directorio_ausente_es_artefacto_faltante() {
    let dir = tempfile::tempdir().unwrap();
    let almacen = AlmacenArtefactos::nuevo(dir.path().join("no-existe"));
    assert!(matches!(almacen.contexto(),
                     Err(PrediccionError::ArtefactoFaltante { .. })));
    assert!(!almacen.esta_cargado());
}

#[test]
fn archivo_ausente_es_artefacto_faltante() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());
    fs::remove_file(dir.path().join(ARCHIVO_CODIFICADORES)).unwrap();

    let almacen = AlmacenArtefactos::nuevo(dir.path());
    assert!(matches!(almacen.contexto(),
                     Err(PrediccionError::ArtefactoFaltante { .. })));
}

#[test]
fn archivo_vacio_es_artefacto_corrupto() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());
    fs::write(dir.path().join(ARCHIVO_REGRESOR), "").unwrap();

    let almacen = AlmacenArtefactos::nuevo(dir.path());
    assert!(matches!(almacen.contexto(),
                     Err(PrediccionError::ArtefactoCorrupto { .. })));
}

#[test]
fn json_invalido_es_artefacto_corrupto() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());
    fs::write(dir.path().join(ARCHIVO_REGRESOR), "{ esto no es json").unwrap();

    let almacen = AlmacenArtefactos::nuevo(dir.path());
    assert!(matches!(almacen.contexto(),
                     Err(PrediccionError::ArtefactoCorrupto { .. })));
}

#[test]
fn regresor_sin_arboles_es_artefacto_corrupto() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());
    fs::write(dir.path().join(ARCHIVO_REGRESOR),
              r#"{"num_caracteristicas": 15, "sesgo_base": 0.0, "arboles": []}"#).unwrap();

    let almacen = AlmacenArtefactos::nuevo(dir.path());
    match almacen.contexto() {
        Err(PrediccionError::ArtefactoCorrupto { detalle, .. }) => {
            assert!(detalle.contains("sin árboles"));
        }
        otro => panic!("se esperaba ArtefactoCorrupto, llegó {otro:?}"),
    }
}

#[test]
fn una_carga_fallida_se_puede_reintentar() {
    let dir = tempfile::tempdir().unwrap();
    let almacen = AlmacenArtefactos::nuevo(dir.path().join("modelos"));

    // Primer intento: no hay nada en disco.
    assert!(almacen.contexto().is_err());
    assert!(!almacen.esta_cargado());

    // Aparecen los artefactos; el siguiente intento debe cargar.
    common::escribir_artefactos(&dir.path().join("modelos"));
    assert!(almacen.contexto().is_ok());
    assert!(almacen.esta_cargado());
}

#[test]
fn cargas_concurrentes_comparten_un_solo_contexto() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());
    let almacen = Arc::new(AlmacenArtefactos::nuevo(dir.path()));

    let manijas: Vec<_> = (0..8).map(|_| {
                                    let almacen = Arc::clone(&almacen);
                                    thread::spawn(move || almacen.contexto().unwrap())
                                })
                                .collect();
    let contextos: Vec<_> = manijas.into_iter().map(|m| m.join().unwrap()).collect();
    for contexto in &contextos[1..] {
        assert!(Arc::ptr_eq(&contextos[0], contexto));
    }
}

#[test]
fn info_modelo_refleja_el_estado() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(dir.path());
    let almacen = AlmacenArtefactos::nuevo(dir.path());

    let antes = almacen.info_modelo();
    assert!(!antes.cargado);
    assert!(antes.codificadores.is_empty());

    almacen.inicializar().unwrap();
    let despues = almacen.info_modelo();
    assert!(despues.cargado);
    assert_eq!(despues.num_caracteristicas, Some(15));
    assert_eq!(despues.columnas_categoricas,
               vec!["genero", "especie", "ubicacion", "tipo"]);
}

#[test]
fn subdirectorio_por_dominio() {
    let dir = tempfile::tempdir().unwrap();
    common::escribir_artefactos(&dir.path().join("Polinizacion"));

    let polinizacion =
        AlmacenArtefactos::para_dominio(dir.path(), DominioPrediccion::Polinizacion);
    assert!(polinizacion.contexto().is_ok());

    let germinacion =
        AlmacenArtefactos::para_dominio(dir.path(), DominioPrediccion::Germinacion);
    assert!(matches!(germinacion.contexto(),
                     Err(PrediccionError::ArtefactoFaltante { .. })));
}
