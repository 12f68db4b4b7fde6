//! URL shortener service implementation.
//!
//! [`ShortenerService`] ties a [`Store`](hashlink_core::Store) to a
//! [`Generator`](hashlink_generator::Generator). Core types are re-exported
//! from `hashlink_core`.

pub mod service;

pub use hashlink_core::{Shortener, ShortenerError};
pub use service::ShortenerService;
