use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by [`Store`](crate::store::Store) implementations.
///
/// `AlreadyExists` and `NotFound` describe the state of a single key.
/// The remaining variants mean the backing medium could not be used and
/// are grouped by [`StoreError::is_storage_failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("short code already exists: {0}")]
    AlreadyExists(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Returns `true` when the error comes from the backing medium rather
    /// than from the presence or absence of a key.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Timeout(_) | StoreError::InvalidData(_)
        )
    }
}

/// Errors returned by [`Shortener`](crate::shortener::Shortener) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("url is already shortened as {code}")]
    AlreadyShortened { code: String },
    #[error("short code {code} is already taken by a different url")]
    CodeCollision { code: String },
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
}
