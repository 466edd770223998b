//! Placeholder distance estimation between two free-text locations.
//!
//! No geocoding is performed. Identical locations (ignoring case) are zero
//! apart; anything else gets a random value in `[1, 51)`.

use rand::Rng;

/// Smallest distance reported for different locations.
pub const MIN_DISTINCT_DISTANCE: f64 = 1.0;
/// Width of the random range above [`MIN_DISTINCT_DISTANCE`].
pub const DISTANCE_SPREAD: f64 = 50.0;

/// Estimates how far apart two locations are.
#[cfg_attr(test, mockall::automock)]
pub trait DistanceEstimator: Send + Sync {
    /// Estimate the distance between `from` and `to`.
    fn estimate(&self, from: &str, to: &str) -> f64;
}

/// Random placeholder estimator.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderDistanceEstimator;

impl DistanceEstimator for PlaceholderDistanceEstimator {
    fn estimate(&self, from: &str, to: &str) -> f64 {
        if from.to_lowercase() == to.to_lowercase() {
            return 0.0;
        }
        let unit: f64 = rand::thread_rng().r#gen();
        MIN_DISTINCT_DISTANCE + unit * DISTANCE_SPREAD
    }
}
