//! Tests for match handlers.

use super::*;
use crate::domain::BloodGroup;
use crate::domain::test_fixtures::{match_details, timestamp};
use crate::inbound::http::test_utils::{MockPorts, send};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn stored(score: i64) -> Match {
    Match::create(
        MatchId::random(),
        match_details(UserId::random(), UserId::random(), score),
        timestamp(0),
    )
}

fn group(raw: &str) -> BloodGroup {
    BloodGroup::new(raw).expect("blood group")
}

#[actix_web::test]
async fn auto_match_reports_the_outcome() {
    let mut ports = MockPorts::default();
    ports
        .matches
        .expect_create_automatic_matches()
        .withf(|blood_group| blood_group.as_str() == "O+")
        .times(1)
        .returning(|blood_group| {
            Ok(AutoMatchOutcome {
                blood_group: blood_group.clone(),
                evaluated_pairs: 6,
                created_matches: 4,
            })
        });

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/matches/auto-match/O+"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Automatic matches created for blood group: O+",
            "bloodGroup": "O+",
            "evaluatedPairs": 6,
            "createdMatches": 4,
        })
    );
}

#[rstest]
#[case(Error::service_unavailable("match store unavailable: down"))]
#[case(Error::internal("compatibility score must be between 0 and 100, got 150"))]
#[actix_web::test]
async fn auto_match_failures_are_generic_bad_requests(#[case] failure: Error) {
    let mut ports = MockPorts::default();
    ports
        .matches
        .expect_create_automatic_matches()
        .times(1)
        .returning(move |_| Err(failure.clone()));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/matches/auto-match/A-"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "Failed to create automatic matches");
    assert!(body.get("details").is_none());
}

#[rstest]
#[case("/api/v1/matches/high-compatibility", 80)]
#[case("/api/v1/matches/high-compatibility?minScore=95", 95)]
#[case("/api/v1/matches/high-compatibility?minScore=0", 0)]
#[actix_web::test]
async fn high_compatibility_defaults_to_eighty(#[case] uri: &str, #[case] threshold: i64) {
    let mut ports = MockPorts::default();
    ports
        .matches_query
        .expect_find_matches()
        .withf(move |filter| {
            *filter == MatchFilter::MinScore(CompatibilityScore::new(threshold).expect("score"))
        })
        .times(1)
        .returning(|_| Ok(vec![stored(100), stored(90)]));

    let (status, body) = send(ports, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::OK);
    let scores: Vec<Value> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item["compatibilityScore"].clone())
        .collect();
    assert_eq!(scores, vec![json!(100), json!(90)]);
}

#[rstest]
#[case("/api/v1/matches/high-compatibility?minScore=101")]
#[case("/api/v1/matches/high-compatibility?minScore=-1")]
#[actix_web::test]
async fn high_compatibility_rejects_out_of_range_thresholds(#[case] uri: &str) {
    let (status, body) = send(MockPorts::default(), actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "minScore");
}

#[actix_web::test]
async fn find_passes_the_location_and_blood_group() {
    let mut ports = MockPorts::default();
    ports
        .matches_query
        .expect_find_potential_matches()
        .withf(|blood_group, location| {
            *blood_group == group("B+") && location.to_string() == "Leeds"
        })
        .times(1)
        .returning(|_, _| Ok(vec![stored(80)]));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/api/v1/matches/find/B+/Leeds"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["distance"], 0.0);
}

#[actix_web::test]
async fn create_defaults_to_pending() {
    let mut ports = MockPorts::default();
    ports
        .matches
        .expect_create_match()
        .withf(|details| {
            details.status == MatchStatus::Pending
                && details.compatibility_score.value() == 70
                && (details.distance.value() - 12.5).abs() < f64::EPSILON
        })
        .times(1)
        .returning(|details| Ok(Match::create(MatchId::random(), details, timestamp(0))));

    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/api/v1/matches").set_json(json!({
            "donorId": UserId::random().to_string(),
            "seekerId": UserId::random().to_string(),
            "bloodGroup": "O-",
            "distance": 12.5,
            "compatibilityScore": 70,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["compatibilityScore"], 70);
}

#[rstest]
#[case("compatibilityScore", json!(101), "compatibilityScore")]
#[case("distance", json!(-0.5), "distance")]
#[case("status", json!("maybe"), "status")]
#[case("donorId", json!("donor-1"), "donorId")]
#[actix_web::test]
async fn create_rejects_invalid_fields(
    #[case] key: &str,
    #[case] value: Value,
    #[case] field: &str,
) {
    let mut body = json!({
        "bloodGroup": "O-",
        "distance": 1.0,
        "compatibilityScore": 70,
    });
    body[key] = value;

    let (status, error) = send(
        MockPorts::default(),
        actix_test::TestRequest::post().uri("/api/v1/matches").set_json(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], field);
}

#[rstest]
#[case("/api/v1/matches/status/accepted", MatchFilter::Status(MatchStatus::Accepted))]
#[case("/api/v1/matches/blood-group/AB+", MatchFilter::BloodGroup(group("AB+")))]
#[case("/api/v1/matches", MatchFilter::All)]
#[actix_web::test]
async fn list_routes_select_the_right_filter(#[case] uri: &str, #[case] expected: MatchFilter) {
    let mut ports = MockPorts::default();
    ports
        .matches_query
        .expect_find_matches()
        .withf(move |filter| *filter == expected)
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let (status, _) = send(ports, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn update_reports_missing_matches() {
    let mut ports = MockPorts::default();
    ports
        .matches
        .expect_update_match()
        .returning(|_, _| Err(Error::not_found("Match not found")));

    let uri = format!("/api/v1/matches/{}", MatchId::random());
    let (status, body) = send(
        ports,
        actix_test::TestRequest::put().uri(&uri).set_json(json!({
            "bloodGroup": "O-",
            "distance": 1.0,
            "compatibilityScore": 70,
            "status": "declined",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Match not found");
}
