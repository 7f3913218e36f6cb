//! Share code generation.
//!
//! This crate provides the code generator trait and the random
//! generator used in production. Core types are re-exported from
//! `textdrop_core`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub use textdrop_core::ShareCode;

/// Trait for generating candidate share codes.
///
/// Implementations are pure generators that don't interact with
/// storage. Candidates are not guaranteed to be unique; the allocator
/// checks them against the repository and asks again on collision.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Generates one candidate share code.
    fn generate(&self) -> ShareCode;
}

/// Random code generator drawing uniformly from [`ShareCode::ALPHABET`].
///
/// The generator owns an explicit RNG rather than reaching for thread
/// local randomness, so a seeded instance replays the same code
/// sequence under test.
#[derive(Debug)]
pub struct RandomCodeGenerator {
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    /// Creates a generator seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a generator with a fixed seed, for deterministic tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ShareCode {
        // `CodeGenerator` is intentionally infallible. A poisoned lock
        // indicates an unrecoverable generator state.
        let mut rng = self
            .rng
            .lock()
            .expect("code generator rng lock should not be poisoned");

        let code: String = (0..ShareCode::LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..ShareCode::ALPHABET.len());
                ShareCode::ALPHABET[idx] as char
            })
            .collect();

        ShareCode::new_unchecked(code)
    }
}
