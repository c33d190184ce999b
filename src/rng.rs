use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Independent, reproducible stream for trajectory `index` of a run seeded
/// with `seed`.
pub fn trajectory_rng(seed: u64, index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(index))
}
