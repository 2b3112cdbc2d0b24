//! Sampling gate

use parking_lot::RwLock;
use rand::Rng;

/// Source of uniform samples in `[0, 100)`
pub trait Sampler: Send + Sync {
    fn sample(&self) -> f64;
}

/// Thread-local RNG backed sampler
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..100.0)
    }
}

/// Always returns the configured value
#[derive(Debug)]
pub struct FixedSampler {
    value: RwLock<f64>,
}

impl FixedSampler {
    pub fn new(value: f64) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub fn set(&self, value: f64) {
        *self.value.write() = value;
    }
}

impl Sampler for FixedSampler {
    fn sample(&self) -> f64 {
        *self.value.read()
    }
}
