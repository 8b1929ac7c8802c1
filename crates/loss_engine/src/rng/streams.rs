//! Deterministic per-block random streams.
//!
//! Trials are generated in fixed-size blocks. Block `k` always draws from
//! the stream derived from `(seed, k)`, so the result of a run depends only
//! on the seed and never on how blocks are scheduled across threads.

use super::prng::SimulationRng;

/// Number of trials generated from one stream.
pub const TRIALS_PER_STREAM: usize = 1_024;

/// Golden-ratio increment used by SplitMix64.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives independent, reproducible generators from a master seed.
///
/// # Examples
///
/// ```rust
/// use loss_engine::rng::StreamFactory;
///
/// let streams = StreamFactory::new(7);
/// let mut a = streams.stream(3);
/// let mut b = StreamFactory::new(7).stream(3);
/// assert_eq!(a.gen_normal(), b.gen_normal());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamFactory {
    seed: u64,
}

impl StreamFactory {
    /// Creates a factory for the given master seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the master seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of stream `index`.
    #[inline]
    pub fn stream_seed(&self, index: u64) -> u64 {
        mix64(self.seed ^ mix64(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
    }

    /// Generator for stream `index`.
    #[inline]
    pub fn stream(&self, index: u64) -> SimulationRng {
        SimulationRng::from_seed(self.stream_seed(index))
    }

    /// Number of streams needed to cover `trial_count` trials.
    #[inline]
    pub fn streams_for(trial_count: usize) -> usize {
        trial_count.div_ceil(TRIALS_PER_STREAM)
    }
}
