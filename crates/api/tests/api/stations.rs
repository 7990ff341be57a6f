use crate::helpers::{get_json, spawn_app, store_error, MockClimateStore};
use climate_api::Station;
use hyper::StatusCode;
use serde_json::json;
use std::sync::Arc;

fn mock_stations() -> Vec<Station> {
    vec![
        Station {
            station: String::from("USC00511918"),
            name: String::from("HONOLULU OBSERVATORY 702.2, HI US"),
        },
        Station {
            station: String::from("USC00519281"),
            name: String::from("WAIHEE 837.5, HI US"),
        },
    ]
}

/// One `{station, name}` entry per station row, no duplicates.
#[tokio::test]
async fn stations_returns_the_full_directory() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_stations()
        .times(1)
        .returning(|| Ok(mock_stations()));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "station": "USC00511918", "name": "HONOLULU OBSERVATORY 702.2, HI US" },
            { "station": "USC00519281", "name": "WAIHEE 837.5, HI US" },
        ])
    );

    let entries = body.as_array().unwrap();
    let mut ids: Vec<&str> = entries
        .iter()
        .map(|e| e["station"].as_str().unwrap())
        .collect();
    ids.dedup();
    assert_eq!(ids.len(), entries.len());
}

#[tokio::test]
async fn stations_returns_empty_array_for_empty_directory() {
    let mut climate_db = MockClimateStore::new();

    climate_db.expect_stations().times(1).returning(|| Ok(vec![]));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn stations_surfaces_store_failure() {
    let mut climate_db = MockClimateStore::new();

    climate_db
        .expect_stations()
        .times(1)
        .returning(|| Err(store_error()));

    let test_app = spawn_app(Arc::new(climate_db)).await;

    let (status, _) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
