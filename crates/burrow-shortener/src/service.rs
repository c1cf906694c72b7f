use crate::allocator::{Allocator, AllocatorSettings};
use async_trait::async_trait;
use burrow_core::{
    normalize_url, Repository, ShortCode, Shortened, Shortener, ShortenerError, StorageError,
    UrlRecord,
};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and an [`Allocator`] to handle:
/// - URL normalization and validation
/// - Reuse of the code already bound to a normalized URL
/// - Allocation of fresh codes, re-allocating when an insert loses a race
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    allocator: Arc<Allocator<G>>,
    max_insert_attempts: usize,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with the default retry budgets.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, AllocatorSettings::default())
    }

    /// Creates a new `ShortenerService` with custom retry budgets.
    pub fn with_settings(repository: R, generator: G, settings: AllocatorSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            allocator: Arc::new(Allocator::new(generator, settings.max_attempts)),
            max_insert_attempts: settings.max_insert_attempts.max(1),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    async fn create(&self, original_url: String) -> Result<Shortened, ShortenerError> {
        for attempt in 1..=self.max_insert_attempts {
            let code = self.allocator.allocate(self.repository.as_ref()).await?;

            match self
                .repository
                .insert(&code, UrlRecord::new(original_url.clone()))
                .await
            {
                Ok(()) => {
                    info!(code = %code, url = %original_url, "short url created");
                    return Ok(Shortened {
                        code,
                        original_url,
                        created: true,
                    });
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, attempt, "short code claimed concurrently, re-allocating");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(ShortenerError::Exhausted {
            attempts: self.max_insert_attempts,
        })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, original_url: &str) -> Result<Shortened, ShortenerError> {
        let original_url = normalize_url(original_url)?;

        if let Some(code) = self.repository.find_code_by_url(&original_url).await? {
            debug!(code = %code, url = %original_url, "reusing existing short url");
            return Ok(Shortened {
                code,
                original_url,
                created: false,
            });
        }

        self.create(original_url).await
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Option<UrlRecord>, ShortenerError> {
        let record = self.repository.get(code).await?;
        match &record {
            Some(record) => debug!(code = %code, url = %record.original_url, "resolved short code"),
            None => debug!(code = %code, "short code not found"),
        }
        Ok(record)
    }

    async fn shutdown(&self) {
        self.repository.close().await;
    }
}
