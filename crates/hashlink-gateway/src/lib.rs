//! HTTP front end for the hashlink URL shortener.
//!
//! Exposes shortening, redirection and deletion of short codes on top of
//! any [`Shortener`](hashlink_core::Shortener).

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
