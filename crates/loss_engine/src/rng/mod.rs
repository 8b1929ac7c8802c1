//! # Random Number Generation
//!
//! Seeded generators for the correlated-default simulation.
//!
//! - [`SimulationRng`]: seeded PRNG wrapper around `rand::rngs::StdRng`
//!   with Ziggurat normal sampling
//! - [`StreamFactory`]: derives one independent generator per block of
//!   [`TRIALS_PER_STREAM`] trials, making parallel runs reproducible
//!
//! ## Usage Example
//!
//! ```rust
//! use loss_engine::rng::{SimulationRng, StreamFactory};
//!
//! let mut rng = SimulationRng::from_seed(12345);
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//!
//! let streams = StreamFactory::new(12345);
//! let mut block_rng = streams.stream(0);
//! let _ = block_rng.gen_normal();
//! ```

mod prng;
mod streams;

pub use prng::SimulationRng;
pub use streams::{StreamFactory, TRIALS_PER_STREAM};
