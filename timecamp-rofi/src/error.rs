use thiserror::Error;
use timecamp::TimecampError;

/// Errors surfaced by the companion's operations.
#[derive(Debug, Error)]
pub enum CampError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("network error: {0}")]
    Network(#[from] TimecampError),
    #[error("{file} is missing or unreadable: {reason}")]
    CacheMiss { file: &'static str, reason: String },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("picker failed: {0}")]
    Picker(String),
}

impl CampError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, CampError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, CampError>;
