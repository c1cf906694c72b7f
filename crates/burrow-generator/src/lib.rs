//! Short code generators.
//!
//! Generators are pure: they never consult storage. Collision handling is the
//! job of the allocator in `burrow-shortener`.

pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use burrow_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations can vary from simple random generators to
/// deterministic counters used for reproducible runs.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate short code.
    ///
    /// The candidate is not guaranteed to be free; callers must check it against the store.
    fn generate(&self) -> Self::Output;
}
