use crate::Generator;
use burrow_core::{ShortCode, ALPHABET, SHORT_CODE_LENGTH};
use std::sync::atomic::{AtomicU64, Ordering};

const BASE: u64 = ALPHABET.len() as u64;

/// A deterministic generator that encodes a counter in base62.
///
/// Produces `aaaaaa`, `aaaaab`, ... and wraps around after 62^6 codes.
/// Two generators started at the same offset produce the same sequence,
/// which makes collisions easy to reproduce.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self::with_offset(self.counter.load(Ordering::SeqCst))
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeqGenerator {
    /// Creates a generator starting at zero.
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific counter value.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }
}

fn encode(mut value: u64) -> String {
    let mut digits = [ALPHABET[0]; SHORT_CODE_LENGTH];
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(value % BASE) as usize];
        value /= BASE;
    }
    digits.iter().map(|&b| b as char).collect()
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(encode(count))
    }
}
