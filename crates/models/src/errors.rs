use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// No record is stored under the identifier.
    #[error("user_not_found")]
    NotFound(String),
    /// The id counter cannot advance past its current value.
    #[error("increment counter exhausted at {0}")]
    CounterExhausted(u64),
}
