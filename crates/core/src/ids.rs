//! Snippet identifier generation.

use rand::Rng;

/// URL-safe alphabet: 64 symbols, so every character carries 6 bits.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_ID_LENGTH: usize = 21;

pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random fixed-length identifiers drawn uniformly from [`ALPHABET`].
#[derive(Debug, Clone, Copy)]
pub struct NanoId {
    length: usize,
}

impl NanoId {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for NanoId {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdGenerator for NanoId {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect()
    }
}
