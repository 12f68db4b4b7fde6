//! Core types and traits for the hashlink URL shortener.
//!
//! This crate owns the definitions shared by every other crate in the
//! workspace: the [`ShortCode`] key type, the [`Store`] capability set,
//! the [`Shortener`] service contract and their error types.

pub mod error;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use error::{ShortenerError, StoreError};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
pub use store::Store;
