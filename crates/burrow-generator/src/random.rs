use crate::Generator;
use burrow_core::{ShortCode, ALPHABET, SHORT_CODE_LENGTH};
use rand::Rng;

/// Draws every character independently and uniformly from [`ALPHABET`].
///
/// Uses the thread-local PRNG. Codes are not meant to be unguessable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::rng();
        let code: String = (0..SHORT_CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();

        ShortCode::new_unchecked(code)
    }
}
