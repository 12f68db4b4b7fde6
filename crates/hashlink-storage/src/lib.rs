//! Store implementations for the hashlink URL shortener.
//!
//! - [`InMemoryStore`] keeps mappings for the lifetime of the process.
//! - [`FileStore`] persists a JSON [`Snapshot`] and survives restarts.

pub mod file;
pub mod memory;
pub mod snapshot;

pub use file::{FileStore, FileStoreSettings};
pub use hashlink_core::error::{Result, StoreError};
pub use hashlink_core::{ShortCode, Store};
pub use memory::InMemoryStore;
pub use snapshot::Snapshot;
