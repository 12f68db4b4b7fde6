use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// The capability set every backing store provides.
///
/// A code maps to exactly one URL at any instant. URLs are not unique: the
/// same URL may be stored under several codes.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Inserts `url` under `code`.
    ///
    /// Returns `Err(AlreadyExists)` if `code` is already mapped; the existing
    /// mapping is left untouched. A successful insert is visible to every
    /// subsequent [`get`](Store::get) on the same store.
    async fn add(&self, code: &ShortCode, url: &str) -> Result<()>;

    /// Deletes the mapping for `code`.
    ///
    /// Returns `Err(NotFound)` if `code` is absent.
    async fn remove(&self, code: &ShortCode) -> Result<()>;

    /// Returns the URL mapped to `code`.
    ///
    /// Returns `Err(NotFound)` if `code` is absent.
    async fn get(&self, code: &ShortCode) -> Result<String>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn add(&self, code: &ShortCode, url: &str) -> Result<()> {
        (**self).add(code, url).await
    }

    async fn remove(&self, code: &ShortCode) -> Result<()> {
        (**self).remove(code).await
    }

    async fn get(&self, code: &ShortCode) -> Result<String> {
        (**self).get(code).await
    }
}
