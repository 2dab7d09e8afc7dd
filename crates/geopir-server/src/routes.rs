//! HTTP routes for the reverse-geocode PIR service

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use geopir_core::negotiation::InitResponse;

use crate::error::{Result, ServerError};
use crate::metrics;
use crate::state::{DatabaseState, SharedState};

#[derive(Deserialize)]
pub struct PirQuery {
    pub init: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub segment_records: u64,
    pub street_records: u64,
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        segment_records: state.segment.record_count,
        street_records: state.street.record_count,
    })
}

/// Parameter negotiation: `GET /pir?init=1`.
///
/// Read-only; serves the cached shapes and public parameters for both
/// databases.
async fn pir_init(
    State(state): State<SharedState>,
    Query(query): Query<PirQuery>,
) -> Result<Json<InitResponse>> {
    if query.init.is_none() {
        return Err(ServerError::InvalidQuery("missing init parameter".into()));
    }
    tracing::debug!("sending params and public params to client");
    Ok(Json(state.init_response()))
}

/// Encrypted query against the segment database.
async fn reverse_segment(State(state): State<SharedState>, body: Bytes) -> Result<Response> {
    answer(&state.segment, body).await
}

/// Encrypted query against the street database.
async fn reverse_street(State(state): State<SharedState>, body: Bytes) -> Result<Response> {
    answer(&state.street, body).await
}

/// Pass the opaque request body to the matching engine handle and return
/// the opaque response bytes verbatim.
async fn answer(db: &DatabaseState, body: Bytes) -> Result<Response> {
    let start = Instant::now();
    metrics::record_request_start(db.name);
    let result = db.handle_request(&body).await;
    metrics::record_request_end(db.name);

    match result {
        Ok(response) => {
            metrics::record_request(db.name, metrics::OUTCOME_OK, start.elapsed());
            tracing::debug!(
                db = db.name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "request answered"
            );
            Ok((
                [(header::CONTENT_TYPE, "application/octet-stream")],
                response,
            )
                .into_response())
        }
        Err(e) => {
            metrics::record_request(db.name, metrics::OUTCOME_ERROR, start.elapsed());
            tracing::error!(db = db.name, error = %e, "query failed");
            Err(e)
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/pir", get(pir_init))
        .route("/reverse/segment", post(reverse_segment))
        .route("/reverse/street", post(reverse_street))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}
