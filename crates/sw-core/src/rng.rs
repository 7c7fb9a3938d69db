//! Deterministic simulation-level RNG wrapper.
//!
//! A run owns exactly one root `SimRng` seeded from the configuration.
//! Sub-systems that need independent streams (e.g. the synthetic landscape
//! versus population initialisation) derive a child with [`SimRng::child`],
//! so adding draws in one stream never perturbs another.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Largest mean sampled in one Knuth pass.  Larger means are split into
/// chunks of at most this size (Poisson variables are additive).
const POISSON_CHUNK: f64 = 30.0;

/// Simulation-level RNG.
///
/// Used only in single-threaded or explicitly synchronised contexts.  If you
/// need parallel randomness, give each worker thread its own `SimRng` seeded
/// from this one.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` for an independent, deterministic stream.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Draw from a Poisson distribution with mean `lambda`.
    ///
    /// Non-positive or non-finite means yield 0.  Uses Knuth's product
    /// method on chunks of at most [`POISSON_CHUNK`].
    pub fn poisson(&mut self, lambda: f64) -> u32 {
        if !lambda.is_finite() || lambda <= 0.0 {
            return 0;
        }
        let mut remaining = lambda;
        let mut total = 0u32;
        while remaining > 0.0 {
            let chunk = remaining.min(POISSON_CHUNK);
            remaining -= chunk;
            total = total.saturating_add(self.knuth(chunk));
        }
        total
    }

    fn knuth(&mut self, lambda: f64) -> u32 {
        let limit = (-lambda).exp();
        let mut k = 0u32;
        let mut p: f64 = self.0.r#gen();
        while p > limit {
            k += 1;
            p *= self.0.r#gen::<f64>();
        }
        k
    }
}
