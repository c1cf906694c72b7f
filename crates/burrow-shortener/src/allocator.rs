use burrow_core::{ReadRepository, ShortCode, ShortenerError};
use burrow_generator::Generator;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

/// Default number of candidates drawn before allocation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
/// Default number of times a shorten request re-allocates after losing an insert race.
pub const DEFAULT_MAX_INSERT_ATTEMPTS: usize = 3;

/// Retry budgets for short code allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct AllocatorSettings {
    /// Candidates checked against the store per allocation.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
    /// Allocate-then-insert rounds per shorten request.
    #[builder(default = DEFAULT_MAX_INSERT_ATTEMPTS)]
    pub max_insert_attempts: usize,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Produces short codes that are not yet bound in a repository.
///
/// Each attempt draws a fresh candidate from the generator and checks it with
/// [`ReadRepository::exists`]. After `max_attempts` taken candidates the
/// allocation fails with [`ShortenerError::Exhausted`].
///
/// A free candidate may still be claimed by a concurrent request before it is
/// inserted; the caller handles that through the store's uniqueness constraint.
#[derive(Debug)]
pub struct Allocator<G> {
    generator: G,
    max_attempts: usize,
}

impl<G: Generator> Allocator<G> {
    /// Creates an allocator. A budget of zero is raised to one attempt.
    pub fn new(generator: G, max_attempts: usize) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns a code that `repository` reported as free.
    pub async fn allocate<R>(&self, repository: &R) -> Result<ShortCode, ShortenerError>
    where
        R: ReadRepository + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate: ShortCode = self.generator.generate().into();

            if !repository.exists(&candidate).await? {
                return Ok(candidate);
            }

            debug!(code = %candidate, attempt, "candidate short code already taken");
        }

        warn!(
            attempts = self.max_attempts,
            "short code allocation exhausted its retry budget"
        );
        Err(ShortenerError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
