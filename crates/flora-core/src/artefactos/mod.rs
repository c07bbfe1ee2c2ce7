//! Artefactos entrenados: regresor, codificadores y metadatos de features.
pub mod almacen;
pub mod codificador;
pub mod metadatos;
pub mod regresor;

pub use almacen::{AlmacenArtefactos, ContextoModelo, DominioPrediccion, InfoModelo,
                  ARCHIVO_CODIFICADORES, ARCHIVO_METADATOS, ARCHIVO_REGRESOR};
pub use codificador::CodificadorCategorico;
pub use metadatos::MetadatosCaracteristicas;
pub use regresor::{Arbol, Nodo, RegresorArtefacto};
