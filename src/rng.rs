//! Injected random sources for sampling.
//!
//! The core never owns ambient randomness: every sampling call takes its
//! random source as an explicit argument, so seeded runs are reproducible
//! and concurrent callers share no hidden state.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Trait for providing random number generators.
pub trait RngProvider: Send + Sync {
    /// The type of RNG this provider creates
    type Rng: rand::RngCore + Clone + Send;

    /// Create a new RNG instance with an optional seed
    fn create_rng(&self, seed: Option<u64>) -> Self::Rng;
}

/// Default RNG provider backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct DefaultRngProvider;

impl RngProvider for DefaultRngProvider {
    type Rng = StdRng;

    fn create_rng(&self, seed: Option<u64>) -> Self::Rng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Create an entropy-seeded RNG from the default provider.
pub fn create_rng() -> StdRng {
    DefaultRngProvider.create_rng(None)
}

/// Create an RNG with a specific seed for reproducible sampling.
pub fn create_seeded_rng(seed: u64) -> StdRng {
    DefaultRngProvider.create_rng(Some(seed))
}
