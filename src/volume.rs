//! Synthetic 24h trading volume.
//!
//! There is no real volume feed; a uniformly drawn integer stands in for it
//! and the liquidity label is derived from a fixed threshold.

use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use crate::models::LiquidityStatus;

/// Smallest volume ever produced.
pub const VOLUME_MIN: i64 = 1_000_000;
/// Largest volume ever produced.
pub const VOLUME_MAX: i64 = 50_000_000;
/// Volumes strictly above this are high liquidity.
pub const HIGH_LIQUIDITY_THRESHOLD: i64 = 10_000_000;

/// Abstraction over randomness so volumes are reproducible in tests.
pub trait RandomSource: Send + Sync {
    /// Draw uniformly from `range` (inclusive on both ends).
    fn draw(&self, range: RangeInclusive<i64>) -> i64;
}

/// Thread-local RNG. The production default.
#[derive(Debug, Clone, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        rand::thread_rng().gen_range(range)
    }
}

/// `StdRng` seeded once, shared across requests.
#[derive(Debug)]
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(range)
    }
}

/// A deterministic source that returns a pre-seeded sequence of values.
///
/// Values are returned as-is, even when outside the requested range.
/// Panics if you request more values than provided.
#[derive(Debug, Default)]
pub struct FixedRandomSource {
    values: Mutex<VecDeque<i64>>,
}

impl FixedRandomSource {
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }
}

impl RandomSource for FixedRandomSource {
    fn draw(&self, _range: RangeInclusive<i64>) -> i64 {
        self.values
            .lock()
            .expect("fixed random source lock poisoned")
            .pop_front()
            .expect("fixed random source exhausted")
    }
}

/// Liquidity label for a volume: high strictly above the threshold.
pub fn liquidity_for(volume: i64) -> LiquidityStatus {
    if volume > HIGH_LIQUIDITY_THRESHOLD {
        LiquidityStatus::High
    } else {
        LiquidityStatus::Medium
    }
}

/// Draw a volume and build the raw payload to be validated downstream.
pub fn synthesize(source: &dyn RandomSource) -> Value {
    let volume = source.draw(VOLUME_MIN..=VOLUME_MAX);
    json!({
        "volume_24h": volume,
        "liquidity_status": liquidity_for(volume).label(),
    })
}
