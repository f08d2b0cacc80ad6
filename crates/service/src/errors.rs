use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backing file could not be read or written.
    #[error("{0}")]
    StoreUnavailable(String),
    /// The backing file exists but does not hold a valid store document.
    #[error("{0}")]
    StoreCorrupt(String),
    #[error("user_not_found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
}

impl ServiceError {
    pub fn unavailable(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(format!("{}: {}", path.display(), err))
    }

    /// Short, stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::StoreUnavailable(_) => "store_unavailable",
            ServiceError::StoreCorrupt(_) => "store_corrupt",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Validation(_) => "validation",
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFound(id) => ServiceError::NotFound(id),
            err @ ModelError::CounterExhausted(_) => ServiceError::StoreCorrupt(err.to_string()),
        }
    }
}
