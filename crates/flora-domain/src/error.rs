use thiserror::Error;
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validacion(String),
    #[error("{0}")]
    FechaInvalida(String),
}
