use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("invalid player record: {0}")]
    InvalidRecord(String),
}
