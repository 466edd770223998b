//! Tests for the automatic matcher.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::matching::{MockCompatibilityScorer, MockDistanceEstimator};
use crate::domain::ports::{FixtureUserRepository, MockMatchRepository, MockUserRepository};
use crate::domain::test_fixtures::{fixture_clock, timestamp, user};

#[fixture]
fn o_positive() -> BloodGroup {
    BloodGroup::new("O+").expect("valid blood group")
}

fn directory(donors: Vec<User>, seekers: Vec<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users.expect_find().returning(move |filter| match filter {
        UserFilter::AvailableByBloodGroup {
            role: UserRole::Donor,
            ..
        } => Ok(donors.clone()),
        UserFilter::AvailableByBloodGroup {
            role: UserRole::Seeker,
            ..
        } => Ok(seekers.clone()),
        other => panic!("unexpected filter {other:?}"),
    });
    users
}

fn recording_store() -> (MockMatchRepository, Arc<Mutex<Vec<Match>>>) {
    let stored = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stored);
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().returning(move |record| {
        sink.lock().expect("store lock").push(record.clone());
        Ok(())
    });
    (matches, stored)
}

fn fixed_scorer(score: i64) -> Arc<dyn CompatibilityScorer> {
    let mut scorer = MockCompatibilityScorer::new();
    scorer.expect_score().return_const(score);
    Arc::new(scorer)
}

fn fixed_estimator(distance: f64) -> Arc<dyn DistanceEstimator> {
    let mut estimator = MockDistanceEstimator::new();
    estimator.expect_estimate().return_const(distance);
    Arc::new(estimator)
}

fn donors(count: usize) -> Vec<User> {
    (0..count)
        .map(|_| user(UserRole::Donor, "O+", "Springfield", true))
        .collect()
}

fn seekers(count: usize) -> Vec<User> {
    (0..count)
        .map(|_| user(UserRole::Seeker, "O+", "Springfield", true))
        .collect()
}

#[rstest]
#[case::no_donors(0, 3)]
#[case::no_seekers(2, 0)]
#[case::empty_directory(0, 0)]
#[tokio::test]
async fn empty_sides_create_nothing(
    o_positive: BloodGroup,
    #[case] donor_count: usize,
    #[case] seeker_count: usize,
) {
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().never();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(donor_count), seekers(seeker_count))),
        Arc::new(matches),
        fixture_clock(0),
    );

    let outcome = matcher.run(&o_positive).await.expect("run succeeds");

    assert_eq!(outcome.evaluated_pairs, 0);
    assert_eq!(outcome.created_matches, 0);
}

#[rstest]
#[tokio::test]
async fn fixture_directory_yields_empty_outcome(o_positive: BloodGroup) {
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().never();
    let matcher = AutomaticMatcher::new(
        Arc::new(FixtureUserRepository),
        Arc::new(matches),
        fixture_clock(0),
    );

    let outcome = matcher.run(&o_positive).await.expect("run succeeds");
    assert_eq!(outcome.blood_group, o_positive);
    assert_eq!(outcome.created_matches, 0);
}

#[rstest]
#[tokio::test]
async fn every_pair_is_evaluated_seeker_first(o_positive: BloodGroup) {
    let donor_list = donors(2);
    let seeker_list = seekers(3);
    let (matches, stored) = recording_store();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donor_list.clone(), seeker_list.clone())),
        Arc::new(matches),
        fixture_clock(42),
    );

    let outcome = matcher.run(&o_positive).await.expect("run succeeds");

    assert_eq!(outcome.evaluated_pairs, 6);
    assert_eq!(outcome.created_matches, 6);
    let stored = stored.lock().expect("store lock");
    let pairs: Vec<_> = stored
        .iter()
        .map(|m| (m.details().seeker_id, m.details().donor_id))
        .collect();
    let expected: Vec<_> = seeker_list
        .iter()
        .flat_map(|s| donor_list.iter().map(move |d| (Some(*s.id()), Some(*d.id()))))
        .collect();
    assert_eq!(pairs, expected);
    for record in stored.iter() {
        assert_eq!(record.details().blood_group, o_positive);
        assert_eq!(record.details().status, MatchStatus::Pending);
        assert_eq!(record.details().compatibility_score.value(), 100);
        assert_eq!(record.details().distance, Distance::ZERO);
        assert_eq!(record.created_at(), timestamp(42));
    }
}

#[rstest]
#[case::below_threshold(49, 0)]
#[case::at_threshold(50, 4)]
#[tokio::test]
async fn threshold_is_inclusive(
    o_positive: BloodGroup,
    #[case] score: i64,
    #[case] expected_matches: usize,
) {
    let (matches, stored) = recording_store();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(2), seekers(2))),
        Arc::new(matches),
        fixture_clock(0),
    )
    .with_scorer(fixed_scorer(score));

    let outcome = matcher.run(&o_positive).await.expect("run succeeds");

    assert_eq!(outcome.evaluated_pairs, 4);
    assert_eq!(outcome.created_matches, expected_matches);
    assert_eq!(stored.lock().expect("store lock").len(), expected_matches);
}

#[rstest]
#[tokio::test]
async fn estimator_output_is_stored(o_positive: BloodGroup) {
    let (matches, stored) = recording_store();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(1), seekers(1))),
        Arc::new(matches),
        fixture_clock(0),
    )
    .with_estimator(fixed_estimator(17.25));

    matcher.run(&o_positive).await.expect("run succeeds");

    let stored = stored.lock().expect("store lock");
    assert_eq!(stored.len(), 1);
    assert!((stored[0].details().distance.value() - 17.25).abs() < f64::EPSILON);
}

#[rstest]
#[case::above_cap(150)]
#[case::far_above_cap(i64::MAX)]
#[case::negative(-1)]
#[case::far_below_zero(i64::MIN)]
#[tokio::test]
async fn out_of_range_scores_are_rejected_before_persistence(
    o_positive: BloodGroup,
    #[case] score: i64,
) {
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().never();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(2), seekers(2))),
        Arc::new(matches),
        fixture_clock(0),
    )
    .with_scorer(fixed_scorer(score));

    let error = matcher.run(&o_positive).await.expect_err("run fails");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn negative_distances_are_rejected(o_positive: BloodGroup) {
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().never();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(1), seekers(1))),
        Arc::new(matches),
        fixture_clock(0),
    )
    .with_estimator(fixed_estimator(-3.0));

    let error = matcher.run(&o_positive).await.expect_err("run fails");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn first_persistence_failure_aborts_the_run(o_positive: BloodGroup) {
    let mut matches = MockMatchRepository::new();
    matches
        .expect_insert()
        .times(1)
        .returning(|_| Err(MatchRepositoryError::connection("pool exhausted")));
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(3), seekers(3))),
        Arc::new(matches),
        fixture_clock(0),
    );

    let error = matcher.run(&o_positive).await.expect_err("run fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn failure_after_some_inserts_keeps_earlier_matches(o_positive: BloodGroup) {
    let stored = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stored);
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().times(3).returning(move |record| {
        let mut guard = sink.lock().expect("store lock");
        if guard.len() == 2 {
            return Err(MatchRepositoryError::query("constraint violated"));
        }
        guard.push(record.clone());
        Ok(())
    });
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(donors(2), seekers(2))),
        Arc::new(matches),
        fixture_clock(0),
    );

    let error = matcher.run(&o_positive).await.expect_err("run fails");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(stored.lock().expect("store lock").len(), 2);
}

#[rstest]
#[tokio::test]
async fn directory_outage_is_service_unavailable(o_positive: BloodGroup) {
    let mut users = MockUserRepository::new();
    users
        .expect_find()
        .times(1)
        .returning(|_| Err(UserRepositoryError::connection("refused")));
    let mut matches = MockMatchRepository::new();
    matches.expect_insert().never();
    let matcher = AutomaticMatcher::new(Arc::new(users), Arc::new(matches), fixture_clock(0));

    let error = matcher.run(&o_positive).await.expect_err("run fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn mixed_scores_only_store_qualifying_pairs(o_positive: BloodGroup) {
    let near = user(UserRole::Donor, "O+", "Springfield", true);
    let far_unavailable = user(UserRole::Donor, "O+", "Shelbyville", false);
    let seeker = user(UserRole::Seeker, "O+", "Springfield", true);
    let (matches, stored) = recording_store();
    let matcher = AutomaticMatcher::new(
        Arc::new(directory(vec![near.clone(), far_unavailable], vec![seeker])),
        Arc::new(matches),
        fixture_clock(0),
    );

    let outcome = matcher.run(&o_positive).await.expect("run succeeds");

    // 100 for the nearby donor, 50 for the unavailable one in another city.
    assert_eq!(outcome.created_matches, 2);
    let scores: Vec<_> = stored
        .lock()
        .expect("store lock")
        .iter()
        .map(|m| (m.details().donor_id, m.details().compatibility_score.value()))
        .collect();
    assert_eq!(scores[0], (Some(*near.id()), 100));
    assert_eq!(scores[1].1, 50);
}
