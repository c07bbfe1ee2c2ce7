//! Acceso al almacén de artefactos: carga única, perezosa y reintetable.
//!
//! El estado cargado es un `ContextoModelo` compartido e inmutable
//! (`Arc`), construido una sola vez por proceso y pasado por referencia a
//! la tubería de features y al motor; no hay estado global implícito, lo
//! que permite inyectar un contexto falso en tests.
//!
//! Garantía de concurrencia: los primeros llamadores concurrentes se
//! serializan en el mutex; exactamente uno ejecuta la carga de disco y el
//! resto observa el mismo resultado. Una carga fallida deja el slot vacío,
//! así que un llamado posterior puede reintentar.

use indexmap::IndexMap;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config;
use crate::errors::PrediccionError;

use super::codificador::CodificadorCategorico;
use super::metadatos::MetadatosCaracteristicas;
use super::regresor::RegresorArtefacto;

pub const ARCHIVO_REGRESOR: &str = "regresor.json";
pub const ARCHIVO_CODIFICADORES: &str = "codificadores.json";
pub const ARCHIVO_METADATOS: &str = "features_metadata.json";

/// Dominio de predicción; cada uno versiona su propio juego de artefactos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominioPrediccion {
    Polinizacion,
    Germinacion,
}

impl DominioPrediccion {
    pub fn subdirectorio(&self) -> &'static str {
        match self {
            DominioPrediccion::Polinizacion => "Polinizacion",
            DominioPrediccion::Germinacion => "Germinacion",
        }
    }
}

/// Los tres artefactos entrenados, ya validados. Inmutable tras la carga.
#[derive(Debug, Clone)]
pub struct ContextoModelo {
    pub regresor: RegresorArtefacto,
    pub codificadores: IndexMap<String, CodificadorCategorico>,
    pub metadatos: MetadatosCaracteristicas,
}

impl ContextoModelo {
    pub fn codificador(&self, columna: &str) -> Option<&CodificadorCategorico> {
        self.codificadores.get(columna)
    }
}

/// Reporte del estado del modelo cargado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoModelo {
    pub cargado: bool,
    pub num_caracteristicas: Option<usize>,
    pub columnas_categoricas: Vec<String>,
    pub codificadores: Vec<String>,
}

pub struct AlmacenArtefactos {
    directorio: PathBuf,
    contexto: Mutex<Option<Arc<ContextoModelo>>>,
}

impl AlmacenArtefactos {
    pub fn nuevo(directorio: impl Into<PathBuf>) -> Self {
        AlmacenArtefactos { directorio: directorio.into(),
                            contexto: Mutex::new(None) }
    }

    /// Almacén para un dominio bajo un directorio base.
    pub fn para_dominio(base: impl AsRef<Path>, dominio: DominioPrediccion) -> Self {
        AlmacenArtefactos::nuevo(base.as_ref().join(dominio.subdirectorio()))
    }

    /// Almacén para un dominio bajo `FLORA_MODELOS_DIR`.
    pub fn desde_entorno(dominio: DominioPrediccion) -> Result<Self, PrediccionError> {
        let base = config::directorio_modelos().ok_or_else(|| PrediccionError::ArtefactoFaltante {
            ruta: "FLORA_MODELOS_DIR sin definir".to_string(),
        })?;
        Ok(AlmacenArtefactos::para_dominio(base, dominio))
    }

    pub fn directorio(&self) -> &Path {
        &self.directorio
    }

    /// Consulta pura, sin efecto: ¿ya hay un contexto cargado?
    pub fn esta_cargado(&self) -> bool {
        self.contexto.lock().expect("mutex del contexto envenenado").is_some()
    }

    /// Carga los artefactos si hace falta. Devuelve `true` si esta llamada
    /// realizó la carga, `false` si ya estaba inicializado.
    pub fn inicializar(&self) -> Result<bool, PrediccionError> {
        let mut guard = self.contexto.lock().expect("mutex del contexto envenenado");
        if guard.is_some() {
            info!("almacén ya inicializado: {}", self.directorio.display());
            return Ok(false);
        }
        let contexto = Self::cargar(&self.directorio)?;
        *guard = Some(Arc::new(contexto));
        Ok(true)
    }

    /// Contexto compartido, cargándolo perezosamente en el primer uso.
    pub fn contexto(&self) -> Result<Arc<ContextoModelo>, PrediccionError> {
        let mut guard = self.contexto.lock().expect("mutex del contexto envenenado");
        if let Some(contexto) = guard.as_ref() {
            return Ok(Arc::clone(contexto));
        }
        let contexto = Arc::new(Self::cargar(&self.directorio)?);
        *guard = Some(Arc::clone(&contexto));
        Ok(contexto)
    }

    pub fn info_modelo(&self) -> InfoModelo {
        let guard = self.contexto.lock().expect("mutex del contexto envenenado");
        match guard.as_ref() {
            None => InfoModelo { cargado: false,
                                 num_caracteristicas: None,
                                 columnas_categoricas: Vec::new(),
                                 codificadores: Vec::new() },
            Some(ctx) => InfoModelo { cargado: true,
                                      num_caracteristicas: Some(ctx.metadatos.feature_list.len()),
                                      columnas_categoricas: ctx.metadatos
                                                               .categorical_columns
                                                               .clone(),
                                      codificadores: ctx.codificadores
                                                        .keys()
                                                        .cloned()
                                                        .collect() },
        }
    }

    fn cargar(directorio: &Path) -> Result<ContextoModelo, PrediccionError> {
        if !directorio.is_dir() {
            warn!("directorio de modelos ausente: {}", directorio.display());
            return Err(PrediccionError::ArtefactoFaltante { ruta: directorio.display()
                                                                            .to_string() });
        }
        info!("cargando artefactos desde {}", directorio.display());

        let regresor: RegresorArtefacto = Self::leer_archivo(directorio, ARCHIVO_REGRESOR)?;
        let codificadores: IndexMap<String, CodificadorCategorico> =
            Self::leer_archivo(directorio, ARCHIVO_CODIFICADORES)?;
        let metadatos: MetadatosCaracteristicas =
            Self::leer_archivo(directorio, ARCHIVO_METADATOS)?;

        // Deserializar a un objeto vacío también cuenta como corrupción.
        if regresor.esta_vacio() {
            return Err(corrupto(directorio, ARCHIVO_REGRESOR, "regresor sin árboles"));
        }
        if codificadores.is_empty() || codificadores.values().any(|c| c.esta_vacio()) {
            return Err(corrupto(directorio, ARCHIVO_CODIFICADORES, "codificadores sin clases"));
        }
        if metadatos.esta_vacio() {
            return Err(corrupto(directorio, ARCHIVO_METADATOS, "lista de features vacía"));
        }

        info!("artefactos cargados: {} features, {} codificadores, {} árboles",
              metadatos.feature_list.len(),
              codificadores.len(),
              regresor.arboles.len());
        Ok(ContextoModelo { regresor, codificadores, metadatos })
    }

    fn leer_archivo<T: DeserializeOwned>(directorio: &Path,
                                         nombre: &str)
                                         -> Result<T, PrediccionError> {
        let ruta = directorio.join(nombre);
        if !ruta.is_file() {
            return Err(PrediccionError::ArtefactoFaltante { ruta: ruta.display().to_string() });
        }
        let contenido = fs::read_to_string(&ruta).map_err(|e| PrediccionError::ArtefactoCorrupto {
            ruta: ruta.display().to_string(),
            detalle: format!("ilegible: {e}"),
        })?;
        if contenido.trim().is_empty() {
            return Err(PrediccionError::ArtefactoCorrupto { ruta: ruta.display().to_string(),
                                                            detalle: "archivo vacío".to_string() });
        }
        serde_json::from_str(&contenido).map_err(|e| PrediccionError::ArtefactoCorrupto {
            ruta: ruta.display().to_string(),
            detalle: format!("deserialización fallida: {e}"),
        })
    }
}

fn corrupto(directorio: &Path, nombre: &str, detalle: &str) -> PrediccionError {
    PrediccionError::ArtefactoCorrupto { ruta: directorio.join(nombre).display().to_string(),
                                         detalle: detalle.to_string() }
}
