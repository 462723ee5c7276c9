use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tradepost::marketplace::listings::fields::quarters::quarterly_labels;
use tradepost::marketplace::listings::repository::{
    BlockStore, PhotoStore, PostStore, SchemaStore,
};
use tradepost::marketplace::listings::{listing_router, ListingService};

pub(crate) fn with_listing_routes<P, H, B, S>(
    service: Arc<ListingService<P, H, B, S>>,
) -> axum::Router
where
    P: PostStore + 'static,
    H: PhotoStore + 'static,
    B: BlockStore + 'static,
    S: SchemaStore + 'static,
{
    listing_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/fields/quarters",
            axum::routing::get(quarters_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuartersQuery {
    /// Override the reference date (YYYY-MM-DD). Defaults to today.
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
}

/// The valid quarterly delivery labels. Recomputed per request because the
/// set shifts at every quarter boundary.
pub(crate) async fn quarters_endpoint(Query(query): Query<QuartersQuery>) -> Json<serde_json::Value> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    Json(json!({ "date": date, "values": quarterly_labels(date) }))
}
