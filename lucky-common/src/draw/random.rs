//! Random number source abstraction
//!
//! Production draws use the thread-local RNG; tests inject a seeded source so
//! statistical assertions are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Uniform random source over `[0.0, 1.0)`
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}

/// Thread-local RNG (`rand::thread_rng`)
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic RNG seeded from a `u64`
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        self.rng
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .gen::<f64>()
    }
}

/// Source that replays a fixed sequence of values, cycling when exhausted
///
/// Test helper: pins a draw to a chosen point of the cumulative weights. It is
/// public so integration tests and downstream crates can use it; production
/// code draws with [`ThreadRandom`].
#[derive(Debug)]
pub struct FixedRandom {
    values: Vec<f64>,
    index: std::sync::atomic::AtomicUsize,
}

impl FixedRandom {
    /// Values should lie in `[0, 1)`; an empty list behaves like `[0.0]`
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            index: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let idx = self
            .index
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.values[idx % self.values.len()]
    }
}
