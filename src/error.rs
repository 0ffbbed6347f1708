use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key material names something unknown, has the wrong length, or
    /// repeats a selection that must be unique.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Derived tables are structurally unsound (not a permutation, reflector
    /// with a fixed point, wheel lengths sharing a factor, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Text contains a symbol the machine does not accept.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RotorError {
    pub(crate) fn key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RotorError>;
