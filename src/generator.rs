use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{HarnessError, Result};

/// Draws `len` integers uniformly from the inclusive range `[lo, hi]`.
pub fn generate<R: Rng + ?Sized>(len: usize, lo: i32, hi: i32, rng: &mut R) -> Result<Vec<i32>> {
    if lo > hi {
        return Err(HarnessError::invalid_config(
            "range",
            format!("lower bound {lo} is greater than upper bound {hi}"),
        ));
    }
    let between = Uniform::new_inclusive(lo, hi);
    Ok(between.sample_iter(rng).take(len).collect())
}

/// Seeded when `seed` is given, otherwise from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
