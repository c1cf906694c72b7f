//! URL shortener service implementation.
//!
//! This crate combines a [`Generator`](burrow_generator::Generator) and a
//! [`Repository`](burrow_core::Repository) into the allocation and lookup
//! logic. Core types are re-exported from `burrow_core`.

pub mod allocator;
pub mod service;

pub use allocator::{Allocator, AllocatorSettings};
pub use burrow_core::{Shortened, Shortener, ShortenerError};
pub use service::ShortenerService;
