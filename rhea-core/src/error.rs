use thiserror::Error;

#[derive(Error, Debug)]
pub enum RheaError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RheaError {
    /// True for errors caused by the caller's request rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RheaError::Validation(_) | RheaError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, RheaError>;
