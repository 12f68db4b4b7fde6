use hashlink_core::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version written into newly created snapshot files.
pub const SNAPSHOT_VERSION: &str = "v1";

/// The entire persisted state of a [`FileStore`](crate::FileStore).
///
/// ```json
/// {"version":"v1","items":{"<code>":"<url>"}}
/// ```
///
/// `version` is carried through unchanged and never branched on; a file
/// without one is read as the current version. Items are kept ordered by
/// code so the file content is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "current_version")]
    pub version: String,
    #[serde(default)]
    pub items: BTreeMap<String, String>,
}

fn current_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl Snapshot {
    /// Creates an empty snapshot at the current version.
    pub fn new() -> Self {
        Self {
            version: current_version(),
            items: BTreeMap::new(),
        }
    }

    /// Parses a snapshot from raw file content.
    ///
    /// Malformed content is an error; there is no partial recovery.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw)
            .map_err(|e| StoreError::InvalidData(format!("unable to parse store snapshot: {e}")))
    }

    /// Serializes the whole snapshot.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            StoreError::InvalidData(format!("unable to serialize store snapshot: {e}"))
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snapshot_layout() {
        let raw = Snapshot::new().to_vec().unwrap();
        assert_eq!(
            String::from_utf8(raw).unwrap(),
            r#"{"version":"v1","items":{}}"#
        );
    }

    #[test]
    fn items_are_written_in_code_order() {
        let mut snapshot = Snapshot::new();
        snapshot
            .items
            .insert("bbbbbbbbbb".to_string(), "https://b.com".to_string());
        snapshot
            .items
            .insert("aaaaaaaaaa".to_string(), "https://a.com".to_string());

        let raw = String::from_utf8(snapshot.to_vec().unwrap()).unwrap();
        assert_eq!(
            raw,
            r#"{"version":"v1","items":{"aaaaaaaaaa":"https://a.com","bbbbbbbbbb":"https://b.com"}}"#
        );
    }

    #[test]
    fn missing_items_parse_as_empty() {
        let snapshot = Snapshot::from_slice(br#"{"version":"v1"}"#).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn missing_version_reads_as_current() {
        let snapshot =
            Snapshot::from_slice(br#"{"items":{"abc1234567":"https://x.com"}}"#).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn foreign_version_is_kept() {
        let snapshot =
            Snapshot::from_slice(br#"{"version":"v7","items":{"abc1234567":"https://x.com"}}"#)
                .unwrap();
        assert_eq!(snapshot.version, "v7");
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn malformed_content_is_invalid_data() {
        let cases: [&[u8]; 5] = [
            b"",
            b"{",
            b"[]",
            br#"{"version":7,"items":{}}"#,
            br#"{"version":"v1","items":[1]}"#,
        ];
        for raw in cases {
            let err = Snapshot::from_slice(raw).unwrap_err();
            assert!(matches!(err, StoreError::InvalidData(_)), "{raw:?}");
        }
    }
}
