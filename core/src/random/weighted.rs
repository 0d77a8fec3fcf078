//! Weighted categorical selection

use tracing::warn;

use super::RandomEngine;
use crate::params::ConfigError;

/// One selectable value and its relative weight (must be > 0)
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedChoice<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> WeightedChoice<T> {
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// A choice with its precomputed cumulative upper limit
#[derive(Debug, Clone)]
struct Bucket<T> {
    value: T,
    weight: f64,
    upper_limit: f64,
}

/// Samples values with probability proportional to their weight
///
/// The cumulative table is built once at construction. A draw `u` in
/// `[0, total_weight)` selects the first bucket whose upper limit is strictly
/// greater than `u`, so a value landing exactly on a boundary belongs to the
/// next bucket.
#[derive(Debug, Clone)]
pub struct WeightedPicker<T> {
    buckets: Vec<Bucket<T>>,
    total_weight: f64,
}

impl<T> WeightedPicker<T> {
    /// Build a picker, rejecting empty input and non-positive or non-finite weights
    pub fn new(choices: impl IntoIterator<Item = WeightedChoice<T>>) -> Result<Self, ConfigError> {
        let mut buckets = Vec::new();
        let mut total_weight = 0.0;

        for (index, choice) in choices.into_iter().enumerate() {
            if !(choice.weight > 0.0 && choice.weight.is_finite()) {
                return Err(ConfigError::InvalidWeight {
                    index,
                    weight: choice.weight,
                });
            }
            total_weight += choice.weight;
            buckets.push(Bucket {
                value: choice.value,
                weight: choice.weight,
                upper_limit: total_weight,
            });
        }

        if buckets.is_empty() {
            return Err(ConfigError::NoChoices);
        }

        Ok(Self {
            buckets,
            total_weight,
        })
    }

    /// Convenience constructor from `(value, weight)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (T, f64)>) -> Result<Self, ConfigError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(value, weight)| WeightedChoice::new(value, weight)),
        )
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Number of choices
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Always false: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Choices in insertion order with their weights
    pub fn choices(&self) -> impl Iterator<Item = (&T, f64)> {
        self.buckets.iter().map(|b| (&b.value, b.weight))
    }

    /// Draw one value (consumes exactly one `next_float`)
    pub fn pick_one(&self, rng: &mut RandomEngine) -> &T {
        self.select(rng.next_float() * self.total_weight)
    }

    /// Select the value for a draw already scaled to `[0, total_weight)`
    ///
    /// Draws at or past the last upper limit (possible when the cumulative sum
    /// rounds below `total_weight`) fall back to the last choice.
    pub fn select(&self, u: f64) -> &T {
        if let Some(bucket) = self.buckets.iter().find(|b| u < b.upper_limit) {
            return &bucket.value;
        }

        warn!(
            "weighted pick {} ran past the cumulative table (total {}), using last choice",
            u, self.total_weight
        );
        // Construction guarantees at least one bucket
        &self.buckets[self.buckets.len() - 1].value
    }
}
