use crate::Generator;
use hashlink_core::ShortCode;
use sha1::{Digest, Sha1};

/// Number of hex characters kept from the digest.
pub const CODE_LENGTH: usize = 10;

/// Derives codes from the SHA-1 digest of the URL.
///
/// The URL is hashed byte-for-byte with no normalization, the digest is
/// hex-encoded in lowercase and the first [`CODE_LENGTH`] characters are
/// used as the code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Generator;

impl Sha1Generator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for Sha1Generator {
    fn generate(&self, url: &str) -> ShortCode {
        let digest = Sha1::digest(url.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(CODE_LENGTH);
        ShortCode::new_unchecked(encoded)
    }
}
