// flora-domain library entry point
pub mod error;
pub mod resultado;
pub mod solicitud;
pub mod validacion;

pub use error::DomainError;
pub use resultado::{ComparacionInicial, NivelConfianza, PrediccionResultado, TipoPrediccion};
pub use solicitud::SolicitudPrediccion;
pub use validacion::{CalidadPrediccion, Tendencia, ValidacionResultado};
