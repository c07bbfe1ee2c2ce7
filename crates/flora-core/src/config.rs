//! Política de confianza y precisión, cargada desde variables de entorno.
//!
//! El piso de confianza (40%) y el factor de precisión por día no tienen
//! una derivación documentada: son constantes de política, configurables,
//! no números mágicos.

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone)]
pub struct PoliticaConfianza {
    /// Confianza base de una predicción refinada (precisión típica del modelo).
    pub base_refinada: f64,
    /// Puntos restados por cada categoría fuera de vocabulario.
    pub penalizacion_categoria: f64,
    /// Banda [minima, maxima] a la que se recorta la confianza refinada.
    pub minima: f64,
    pub maxima: f64,
    /// Confianza base de la etapa heurística inicial.
    pub base_inicial: f64,
    /// Puntos de precisión perdidos por cada día de desviación al validar.
    pub factor_precision: f64,
}

impl Default for PoliticaConfianza {
    fn default() -> Self {
        PoliticaConfianza { base_refinada: 85.0,
                            penalizacion_categoria: 5.0,
                            minima: 40.0,
                            maxima: 95.0,
                            base_inicial: 30.0,
                            factor_precision: 2.0 }
    }
}

fn leer_f64(nombre: &str, por_defecto: f64) -> f64 {
    env::var(nombre).ok().and_then(|v| v.parse().ok()).unwrap_or(por_defecto)
}

impl PoliticaConfianza {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let defecto = PoliticaConfianza::default();
        PoliticaConfianza {
            base_refinada: leer_f64("FLORA_CONFIANZA_BASE", defecto.base_refinada),
            penalizacion_categoria: leer_f64("FLORA_PENALIZACION_CATEGORIA",
                                             defecto.penalizacion_categoria),
            minima: leer_f64("FLORA_CONFIANZA_MIN", defecto.minima),
            maxima: leer_f64("FLORA_CONFIANZA_MAX", defecto.maxima),
            base_inicial: leer_f64("FLORA_CONFIANZA_INICIAL", defecto.base_inicial),
            factor_precision: leer_f64("FLORA_FACTOR_PRECISION", defecto.factor_precision),
        }
    }

    /// Recorta la confianza refinada a la banda configurada.
    pub fn ajustar(&self, confianza: f64) -> f64 {
        confianza.clamp(self.minima, self.maxima)
    }
}

/// Directorio base de los artefactos (`FLORA_MODELOS_DIR`).
pub fn directorio_modelos() -> Option<PathBuf> {
    Lazy::force(&DOTENV_LOADED);
    env::var("FLORA_MODELOS_DIR").ok().map(PathBuf::from)
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
