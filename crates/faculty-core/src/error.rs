use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Record store error: {0}")]
    Store(String),

    #[error("Index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScoutError::Decode(err.to_string())
        } else {
            ScoutError::Transport(err.to_string())
        }
    }
}

impl ScoutError {
    /// Whether this error came from talking to a remote API
    pub fn is_transport(&self) -> bool {
        matches!(self, ScoutError::Transport(_) | ScoutError::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
