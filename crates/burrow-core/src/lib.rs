//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the types shared by the storage backends, the
//! shortener service and the HTTP gateway.

pub mod error;
pub mod normalize;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, ShortenerError, StorageError};
pub use normalize::normalize_url;
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::{ShortCode, ALPHABET, SHORT_CODE_LENGTH};
pub use shortener::{Shortened, Shortener};
