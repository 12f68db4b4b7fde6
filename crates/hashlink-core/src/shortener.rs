use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `url` and returns the code it is stored under.
    async fn shorten(&self, url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the URL it was created for.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;

    /// Deletes a shortened URL by its short code.
    async fn delete(&self, code: &ShortCode) -> Result<()>;
}
