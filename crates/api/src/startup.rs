use crate::{
    db::{ClimateData, ClimateStore},
    index_handler, precipitation, routes, stations, stats_from_start, stats_in_range, tobs,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::precipitation,
        routes::climate::stations,
        routes::climate::tobs,
        routes::climate::stats_from_start,
        routes::climate::stats_in_range,
    ),
    components(
        schemas(
            crate::db::Station,
            crate::db::Tobs,
            crate::db::TempStats,
        )
    ),
    tags(
        (name = "climate api", description = "read-only JSON summaries over a pre-populated climate observation dataset")
    )
)]
struct ApiDoc;

pub async fn build_app_state(database_path: &str) -> Result<AppState, anyhow::Error> {
    let store = ClimateStore::new(database_path)
        .await
        .map_err(|e| anyhow!("error opening climate database: {}", e))?;

    store
        .health_check()
        .await
        .map_err(|e| anyhow!("climate database failed health check: {}", e))?;
    info!("climate database opened read-only at: {}", database_path);

    Ok(AppState {
        climate_db: Arc::new(store),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        // Static segments take priority over the {start} capture
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(stats_from_start))
        .route("/api/v1.0/{start}/{end}", get(stats_in_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
