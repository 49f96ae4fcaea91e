//! Weighted random draw
//!
//! - [`resolver`]: member names + override map -> weights
//! - [`engine`]: one weighted selection over those weights
//! - [`random`]: the uniform `[0, 1)` source the engine samples from

pub mod engine;
pub mod random;
pub mod resolver;

pub use engine::draw;
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use resolver::{resolve_weights, WeightedMember};
