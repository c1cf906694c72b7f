//! HTTP surface of the Burrow URL shortener.
//!
//! Exposes `POST /shorten`, `GET /{code}` and `GET /healthz` on top of any
//! [`Shortener`](burrow_core::Shortener) implementation.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod qr;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use qr::QrOptions;
pub use state::AppState;
