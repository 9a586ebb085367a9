use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("write rejected: {0}")]
    WriteRejected(String),

    #[error("stored value is not valid UTF-8 under key {0}")]
    Encoding(String),
}
