//! Seedable random sources.
//!
//! Every run owns its generator; nothing in the crate touches a
//! thread-global RNG once a run has started.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
