use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentApiError>;

#[derive(Debug, Error)]
pub enum ContentApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid content reference: {0:?}")]
    InvalidReference(String),
}

impl From<reqwest::Error> for ContentApiError {
    fn from(err: reqwest::Error) -> Self {
        ContentApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ContentApiError {
    fn from(err: serde_json::Error) -> Self {
        ContentApiError::Parse(err.to_string())
    }
}
