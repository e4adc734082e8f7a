use thiserror::Error;

use bloblite_store::{ErrorKind, StoreError};

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SdkError {
    /// Classification of the underlying storage failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(e) => e.kind(),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
