use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use meter_core::{series, UsageReading};

use crate::{
    error::Result,
    rate_limit,
    state::AppState,
    validation::{validate_usage_query, UsageQuery},
};

/// Data routes sit behind the per-client rate limit; `/health` does not.
pub fn router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/meters", get(list_meters))
        .route("/meter-usage", get(meter_usage))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::enforce));

    Router::new()
        .route("/health", get(health))
        .merge(limited)
        .with_state(state)
}

/// Serialises straight from the shared catalog; no per-request copy.
async fn list_meters(State(state): State<AppState>) -> Response {
    metrics::counter!("http_requests_total", "route" => "/meters").increment(1);

    state.simulate_latency().await;
    Json(state.catalog.list_meters()).into_response()
}

async fn meter_usage(
    State(state): State<AppState>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<Vec<UsageReading>>> {
    metrics::counter!("http_requests_total", "route" => "/meter-usage").increment(1);

    let window = validate_usage_query(&state.catalog, query, state.max_range_minutes).map_err(|e| {
        metrics::counter!("meter_usage_rejected_total", "reason" => e.reason()).increment(1);
        tracing::debug!(error = %e, "rejected meter usage query");
        e
    })?;

    state.simulate_latency().await;

    let readings = series(&window.meter_id, window.start, window.end)?;

    metrics::histogram!("meter_usage_series_len").record(readings.len() as f64);
    metrics::counter!("usage_readings_served_total").increment(readings.len() as u64);
    tracing::debug!(
        meter_id = %window.meter_id,
        start = %window.start,
        end = %window.end,
        readings = readings.len(),
        "served meter usage"
    );

    Ok(Json(readings))
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
