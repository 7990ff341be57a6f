use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use time::Date;

use crate::{
    db::{self, trailing_year_start, Station, TempStats, Tobs, DATE_FORMAT, MOST_ACTIVE_STATION},
    AppState,
};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },
    #[error("failed to query climate data: {0}")]
    Store(#[from] db::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                error!("climate store failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Parse a `YYYY-MM-DD` path parameter, distinct from "no matching rows":
/// a malformed date is a 400, never an empty 200.
fn parse_date_param(input: &str) -> Result<Date, ApiError> {
    Date::parse(input, DATE_FORMAT).map_err(|_| ApiError::InvalidDate {
        input: input.to_owned(),
    })
}

/// Precipitation by date over the trailing year.
///
/// Duplicate dates (multiple stations reporting the same day) collapse to
/// the last row seen, matching the mapping contract.
#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = 200, description = "Mapping of date to precipitation over the trailing year; empty when the dataset has no measurements"),
        (status = 500, description = "Dataset unavailable")
    )
)]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, ApiError> {
    let Some(anchor) = state.climate_db.latest_date().await? else {
        return Ok(Json(BTreeMap::new()));
    };

    let start = trailing_year_start(anchor);
    let readings = state.climate_db.precipitation_since(start).await?;

    let mut by_date = BTreeMap::new();
    for reading in readings {
        by_date.insert(reading.date, reading.prcp);
    }

    Ok(Json(by_date))
}

/// The station directory, one entry per station row.
#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = 200, description = "All stations with their display names", body = [Station]),
        (status = 500, description = "Dataset unavailable")
    )
)]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Station>>, ApiError> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations))
}

/// Temperature observations for the most-active station over the trailing
/// year.
#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = 200, description = "Dated temperature observations for the most-active station; empty when the dataset has no measurements", body = [Tobs]),
        (status = 500, description = "Dataset unavailable")
    )
)]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Tobs>>, ApiError> {
    let Some(anchor) = state.climate_db.latest_date().await? else {
        return Ok(Json(Vec::new()));
    };

    let start = trailing_year_start(anchor);
    let observations = state
        .climate_db
        .station_observations(MOST_ACTIVE_STATION, start)
        .await?;

    Ok(Json(observations))
}

/// Min/avg/max temperature for all records dated on or after `start`.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(("start" = String, Path, description = "Start date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Temperature statistics; all fields null when no rows match", body = TempStats),
        (status = 400, description = "Malformed start date"),
        (status = 500, description = "Dataset unavailable")
    )
)]
pub async fn stats_from_start(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TempStats>, ApiError> {
    let start = parse_date_param(&start)?;
    let stats = state.climate_db.temperature_stats(start, None).await?;
    Ok(Json(stats))
}

/// Min/avg/max temperature for all records dated within `start..=end`.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Start date, YYYY-MM-DD"),
        ("end" = String, Path, description = "End date (inclusive), YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Temperature statistics; all fields null when no rows match", body = TempStats),
        (status = 400, description = "Malformed start or end date"),
        (status = 500, description = "Dataset unavailable")
    )
)]
pub async fn stats_in_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TempStats>, ApiError> {
    let start = parse_date_param(&start)?;
    let end = parse_date_param(&end)?;
    let stats = state.climate_db.temperature_stats(start, Some(end)).await?;
    Ok(Json(stats))
}
