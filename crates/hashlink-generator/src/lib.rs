pub mod hash;

pub use crate::hash::{Sha1Generator, CODE_LENGTH};

use hashlink_core::ShortCode;

/// Trait for deriving short codes from URLs.
///
/// Implementations are pure functions of the URL bytes and never touch
/// storage. Two different URLs may map to the same code; detecting that
/// is left to the store's uniqueness check.
pub trait Generator: Send + Sync + 'static {
    /// Derives the short code for `url`.
    ///
    /// The same input always produces the same code.
    fn generate(&self, url: &str) -> ShortCode;
}
