use async_trait::async_trait;
use hashlink_core::{ShortCode, Shortener, ShortenerError, Store, StoreError};
use hashlink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many times `shorten` tries to claim a code whose conflicting mapping
/// vanishes before it can be read back.
const ADD_ATTEMPTS: usize = 2;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Store` and a `Generator` to handle:
/// - URL validation
/// - Short code derivation
/// - Telling a repeated submission apart from a hash collision
///
/// Codes are never retried or lengthened: when the derived code is already
/// taken the request is rejected.
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<S: Store, G: Generator> ShortenerService<S, G> {
    pub fn new(store: S, generator: G) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates that the URL has a valid format (has a scheme and host).
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {url}"
            )));
        };
        if scheme.is_empty() || rest.is_empty() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {url}"
            )));
        }

        let scheme = scheme.to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {scheme}"
            )));
        }

        Ok(())
    }

    /// Decides why `code` was already taken when `url` tried to claim it.
    ///
    /// Returns `None` when the mapping disappeared before it could be read
    /// back, in which case the code is free again.
    async fn classify_conflict(&self, code: &ShortCode, url: &str) -> Option<ShortenerError> {
        match self.store.get(code).await {
            Ok(existing) if existing == url => Some(ShortenerError::AlreadyShortened {
                code: code.to_string(),
            }),
            Ok(existing) => {
                warn!(code = %code, url, existing = %existing, "short code collision");
                Some(ShortenerError::CodeCollision {
                    code: code.to_string(),
                })
            }
            Err(StoreError::NotFound(_)) => None,
            Err(e) => Some(store_to_shortener_error(e)),
        }
    }
}

#[async_trait]
impl<S: Store, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, url: &str) -> Result<ShortCode, ShortenerError> {
        Self::validate_url(url)?;

        let code = self.generator.generate(url);

        for _ in 0..ADD_ATTEMPTS {
            match self.store.add(&code, url).await {
                Ok(()) => {
                    info!(code = %code, url, "shortened url");
                    return Ok(code);
                }
                Err(StoreError::AlreadyExists(_)) => {}
                Err(e) => return Err(store_to_shortener_error(e)),
            }

            if let Some(err) = self.classify_conflict(&code, url).await {
                return Err(err);
            }
            debug!(code = %code, "conflicting mapping was removed, retrying");
        }

        Err(ShortenerError::Storage(format!(
            "mapping for {code} kept changing while it was being added"
        )))
    }

    async fn resolve(&self, code: &ShortCode) -> Result<String, ShortenerError> {
        let url = self
            .store
            .get(code)
            .await
            .map_err(store_to_shortener_error)?;
        debug!(code = %code, url = %url, "resolved short code");
        Ok(url)
    }

    async fn delete(&self, code: &ShortCode) -> Result<(), ShortenerError> {
        self.store
            .remove(code)
            .await
            .map_err(store_to_shortener_error)?;
        info!(code = %code, "deleted short code");
        Ok(())
    }
}

/// Converts a StoreError to a ShortenerError.
fn store_to_shortener_error(e: StoreError) -> ShortenerError {
    if e.is_storage_failure() {
        warn!(error = %e, "store operation failed");
        return ShortenerError::Storage(e.to_string());
    }

    match e {
        StoreError::NotFound(code) => ShortenerError::NotFound(code),
        StoreError::AlreadyExists(code) => ShortenerError::AlreadyShortened { code },
        other => ShortenerError::Storage(other.to_string()),
    }
}
