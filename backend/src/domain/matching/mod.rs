//! Matching core: compatibility scoring, distance estimation and the
//! automatic matcher that combines them over directory data.

mod distance;
mod matcher;
mod scorer;

#[cfg(test)]
pub use distance::MockDistanceEstimator;
pub use distance::{
    DISTANCE_SPREAD, DistanceEstimator, MIN_DISTINCT_DISTANCE, PlaceholderDistanceEstimator,
};
pub(crate) use matcher::{map_match_repository_error, map_user_repository_error};
pub use matcher::{AutoMatchOutcome, AutomaticMatcher, MATCH_THRESHOLD};
#[cfg(test)]
pub use scorer::MockCompatibilityScorer;
pub use scorer::{
    AVAILABILITY_POINTS, AdditiveScorer, BLOOD_GROUP_POINTS, CompatibilityScorer, LOCATION_POINTS,
    SCORE_CAP, ScoringInput,
};
