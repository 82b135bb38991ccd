//! Projection engine.
//!
//! - Injectable random sources (seeded PCG with partitioned streams, or
//!   the thread-local OS-seeded generator)
//! - The projection pipeline tying trend, simulation and risk together

pub mod pipeline;
pub mod rng;

pub use pipeline::{ProjectionPipeline, ProjectionResult};
pub use rng::{RandomSource, SimRng, ThreadRandom};
