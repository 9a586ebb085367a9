use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("cannot prepare data directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbError> for pocket_store::StoreError {
    fn from(e: LmdbError) -> Self {
        pocket_store::StoreError::Backend(e.to_string())
    }
}
