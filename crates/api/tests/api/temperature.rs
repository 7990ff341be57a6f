use crate::helpers::{get_body, get_json, spawn_app, MockClimateStore};
use climate_api::TempStats;
use hyper::StatusCode;
use serde_json::json;
use std::sync::Arc;
use time::macros::date;

fn stats(tmin: f64, tavg: f64, tmax: f64) -> TempStats {
    TempStats {
        tmin: Some(tmin),
        tavg: Some(tavg),
        tmax: Some(tmax),
    }
}

#[tokio::test]
async fn stats_from_start_passes_an_open_ended_range() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_temperature_stats()
        .withf(|start, end| *start == date!(2017 - 08 - 20) && end.is_none())
        .times(1)
        .returning(|_, _| Ok(stats(58.0, 74.6, 87.0)));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-08-20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "TMIN": 58.0, "TAVG": 74.6, "TMAX": 87.0 }));
}

/// Worked example: two rows at 70 and 80 over an inclusive two-day range.
#[tokio::test]
async fn stats_in_range_passes_both_bounds() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_temperature_stats()
        .withf(|start, end| {
            *start == date!(2017 - 08 - 20) && *end == Some(date!(2017 - 08 - 21))
        })
        .times(1)
        .returning(|_, _| Ok(stats(70.0, 75.0, 80.0)));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-08-20/2017-08-21").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "TMIN": 70.0, "TAVG": 75.0, "TMAX": 80.0 }));
}

/// `start == end` is a single-day range, not an error.
#[tokio::test]
async fn stats_accepts_equal_start_and_end() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_temperature_stats()
        .withf(|start, end| {
            *start == date!(2017 - 08 - 20) && *end == Some(date!(2017 - 08 - 20))
        })
        .times(1)
        .returning(|_, _| Ok(stats(70.0, 70.0, 70.0)));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-08-20/2017-08-20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "TMIN": 70.0, "TAVG": 70.0, "TMAX": 70.0 }));
}

/// Zero matching rows is a valid result: 200 with all-null statistics,
/// never an error.
#[tokio::test]
async fn stats_returns_nulls_when_no_rows_match() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_temperature_stats()
        .times(1)
        .returning(|_, _| Ok(TempStats::default()));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2050-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "TMIN": null, "TAVG": null, "TMAX": null }));
}

/// A malformed date is a client error, distinct from the all-null
/// empty-range result, and the store is never queried.
#[tokio::test]
async fn stats_rejects_malformed_start_date() {
    let climate_db = MockClimateStore::new();

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/not-a-date").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("not-a-date"));
}

#[tokio::test]
async fn stats_rejects_malformed_end_date() {
    let climate_db = MockClimateStore::new();

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, _) = get_json(&test_app.app, "/api/v1.0/2017-08-20/2017-13-99").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// The same request against an unchanged dataset yields byte-identical
/// JSON.
#[tokio::test]
async fn stats_responses_are_idempotent() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_temperature_stats()
        .times(2)
        .returning(|_, _| Ok(stats(58.0, 74.6, 87.0)));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status_a, body_a) = get_body(&test_app.app, "/api/v1.0/2017-08-20").await;
    let (status_b, body_b) = get_body(&test_app.app, "/api/v1.0/2017-08-20").await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(body_a, body_b);
}
