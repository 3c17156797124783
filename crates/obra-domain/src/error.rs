// error.rs
use thiserror::Error;

/// Error del dominio de obra: entidades que no cumplen sus invariantes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    Validation(String),

    #[error("Error de serialización: {0}")]
    Serialization(String),
}

// Implementación de conversión desde serde_json::Error a DomainError
impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
