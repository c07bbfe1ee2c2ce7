//! flora-core: núcleo de predicción por etapas (inicial → refinada → validada)
pub mod artefactos;
pub mod cache;
pub mod caracteristicas;
pub mod config;
pub mod errors;
pub mod hashing;
pub mod motor;
pub mod validacion;

pub use artefactos::{AlmacenArtefactos, ContextoModelo, DominioPrediccion, InfoModelo};
pub use cache::CachePredicciones;
pub use caracteristicas::{construir_vector, VectorCaracteristicas};
pub use config::PoliticaConfianza;
pub use errors::PrediccionError;
pub use motor::{FalloPrediccion, MotorPrediccion, SalidaPrediccion};
pub use validacion::validar_prediccion;
