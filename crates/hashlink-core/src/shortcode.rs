use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The key under which a URL is stored.
///
/// Generated codes are hex prefixes of a content hash, but a `ShortCode` can
/// hold any non-empty string: codes taken from request paths are looked up
/// as-is and simply miss when they were never stored.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a `ShortCode` from a string.
    ///
    /// Returns `None` for an empty string.
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        if code.is_empty() {
            return None;
        }
        Some(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// such as the hash generator; codes taken from requests go through
    /// [`ShortCode::new`].
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code and returns the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_is_rejected() {
        assert!(ShortCode::new("").is_none());
        assert!(ShortCode::new("a").is_some());
    }

    #[test]
    fn display() {
        let code = ShortCode::new_unchecked("8c5e1d2a3b");
        assert_eq!(code.to_string(), "8c5e1d2a3b");
    }

    #[test]
    fn to_url_joins_with_single_slash() {
        let code = ShortCode::new_unchecked("abc1234567");
        assert_eq!(
            code.to_url("http://localhost:8080/r"),
            "http://localhost:8080/r/abc1234567"
        );
        assert_eq!(
            code.to_url("http://localhost:8080/r/"),
            "http://localhost:8080/r/abc1234567"
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = ShortCode::new_unchecked("abc1234567");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abc1234567\"");

        let parsed: ShortCode = serde_json::from_str("\"abc1234567\"").unwrap();
        assert_eq!(parsed, code);
    }
}
