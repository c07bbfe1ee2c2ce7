//! Codificador categórico entrenado (clase ↔ código entero).
//!
//! Inmutable en inferencia. La búsqueda devuelve `Option<u32>` explícito:
//! el respaldo a `cardinalidad()` para valores fuera de vocabulario lo
//! aplica el llamador, nunca un flujo de control por excepción.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CodificadorCategorico {
    clases: Vec<String>,
    indices: HashMap<String, u32>,
}

impl From<Vec<String>> for CodificadorCategorico {
    fn from(clases: Vec<String>) -> Self {
        let indices = clases.iter()
                            .enumerate()
                            .map(|(i, c)| (c.clone(), i as u32))
                            .collect();
        CodificadorCategorico { clases, indices }
    }
}

impl From<CodificadorCategorico> for Vec<String> {
    fn from(codificador: CodificadorCategorico) -> Self {
        codificador.clases
    }
}

impl CodificadorCategorico {
    pub fn nuevo(clases: Vec<String>) -> Self {
        clases.into()
    }

    /// Código entrenado del valor (exacto tras recortar espacios), si existe.
    pub fn codificar(&self, valor: &str) -> Option<u32> {
        self.indices.get(valor.trim()).copied()
    }

    pub fn decodificar(&self, codigo: u32) -> Option<&str> {
        self.clases.get(codigo as usize).map(String::as_str)
    }

    /// Número de clases conocidas; también es el código reservado para
    /// valores no vistos en entrenamiento.
    pub fn cardinalidad(&self) -> u32 {
        self.clases.len() as u32
    }

    pub fn esta_vacio(&self) -> bool {
        self.clases.is_empty()
    }

    pub fn clases(&self) -> &[String] {
        &self.clases
    }
}
