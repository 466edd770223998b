//! Compatibility scoring for a donor/seeker pair.
//!
//! The default [`AdditiveScorer`] awards points in a fixed order:
//!
//! | rule                                               | points |
//! |----------------------------------------------------|--------|
//! | identical blood group (case-sensitive)             | 50     |
//! | either location contains the other (ignoring case) | 30     |
//! | donor is available                                 | 20     |
//!
//! The sum is capped at 100. Only the donor's availability counts, so the
//! score is not symmetric.

use crate::domain::User;

/// Points for an identical blood group.
pub const BLOOD_GROUP_POINTS: i64 = 50;
/// Points when one location contains the other.
pub const LOCATION_POINTS: i64 = 30;
/// Points when the donor is available.
pub const AVAILABILITY_POINTS: i64 = 20;
/// Upper bound applied to the sum.
pub const SCORE_CAP: i64 = 100;

/// The three attributes scoring looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringInput<'a> {
    pub blood_group: &'a str,
    pub location: &'a str,
    pub is_available: bool,
}

impl<'a> From<&'a User> for ScoringInput<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            blood_group: user.blood_group().as_str(),
            location: user.location().as_str(),
            is_available: user.is_available(),
        }
    }
}

/// Computes a compatibility score for a donor/seeker pair.
///
/// Implementations should return a value in `0..=100`; the automatic matcher
/// rejects anything else before it reaches the match store.
#[cfg_attr(test, mockall::automock)]
pub trait CompatibilityScorer: Send + Sync {
    /// Score `donor` against `seeker`.
    fn score(&self, donor: &User, seeker: &User) -> i64;
}

/// Default additive scorer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdditiveScorer;

impl AdditiveScorer {
    /// Score raw attributes.
    ///
    /// Empty locations trivially contain each other, so two blank locations
    /// earn the location points.
    ///
    /// # Examples
    /// ```
    /// use bloodmatch::domain::{AdditiveScorer, ScoringInput};
    ///
    /// let donor = ScoringInput { blood_group: "O+", location: "Springfield", is_available: true };
    /// let seeker = ScoringInput { blood_group: "O+", location: "spring", is_available: false };
    /// assert_eq!(AdditiveScorer::score_inputs(donor, seeker), 100);
    /// ```
    pub fn score_inputs(donor: ScoringInput<'_>, seeker: ScoringInput<'_>) -> i64 {
        let mut score = 0;
        if donor.blood_group == seeker.blood_group {
            score += BLOOD_GROUP_POINTS;
        }
        if locations_overlap(donor.location, seeker.location) {
            score += LOCATION_POINTS;
        }
        if donor.is_available {
            score += AVAILABILITY_POINTS;
        }
        score.min(SCORE_CAP)
    }
}

impl CompatibilityScorer for AdditiveScorer {
    fn score(&self, donor: &User, seeker: &User) -> i64 {
        Self::score_inputs(donor.into(), seeker.into())
    }
}

fn locations_overlap(left: &str, right: &str) -> bool {
    let left = left.to_lowercase();
    let right = right.to_lowercase();
    left.contains(&right) || right.contains(&left)
}
