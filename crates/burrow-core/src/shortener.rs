use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Outcome of a successful shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The code bound to the URL.
    pub code: ShortCode,
    /// The normalized URL the code resolves to.
    pub original_url: String,
    /// `false` when an existing mapping was reused.
    pub created: bool,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `original_url` and returns the code bound to its normalized form.
    ///
    /// Submitting the same normalized URL twice returns the same code.
    async fn shorten(&self, original_url: &str) -> Result<Shortened>;

    /// Resolves a short code to its stored URL record.
    /// Returns `None` if the code does not exist.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Releases the underlying store. Called once at shutdown.
    async fn shutdown(&self);
}
