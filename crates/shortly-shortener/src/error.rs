use shortly_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The store of record failed.
    #[error("storage error: {0}")]
    Storage(StorageError),
    /// The cache tier failed while saving. The url may already be in the
    /// store of record.
    #[error("cache error: {0}")]
    Cache(StorageError),
    #[error("the primary store does not support listing recent urls")]
    Unsupported,
}
