//! HTTP routes for the NekoStats API.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use nekostats_core::aggregate::{DashboardSummaries, SummaryKind};
use nekostats_core::auth::Authorizer;
use nekostats_core::error::StatsError;
use nekostats_core::event::EventSubmission;
use nekostats_core::range::RangeSelector;
use nekostats_core::store::EventStore;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::authorize;

/// Shared state for the API routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub authorizer: Arc<dyn Authorizer>,
}

/// Creates the axum router with all NekoStats routes.
///
/// # Example
///
/// ```rust,ignore
/// let app = stats_routes(AppState {
///     store: Arc::new(MemoryEventStore::new()),
///     authorizer: Arc::new(AllowAll),
/// });
/// ```
pub fn stats_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/events", post(ingest_handler).get(raw_events_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Query-string parameters shared by the query endpoints.
#[derive(Debug, Deserialize)]
struct StatsQuery {
    /// Range token: "24h", "7d", or empty/absent for all time.
    range: Option<String>,
    /// Chart token selecting one summary. Absent returns all of them.
    chart: Option<String>,
}

async fn ingest_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<EventSubmission>,
) -> Result<Response, StatsErrorResponse> {
    authorize(state.authorizer.as_ref(), &headers)?;

    let event = submission.into_event()?;
    let id = state.store.append(&event).await?;
    tracing::debug!(%id, event_type = %event.event_type, "event ingested");

    let body = serde_json::json!({ "id": id });
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn stats_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<StatsQuery>,
) -> Result<Response, StatsErrorResponse> {
    authorize(state.authorizer.as_ref(), &headers)?;

    let selector = RangeSelector::parse(params.range.as_deref())?;
    let range = selector.bounds(Utc::now());
    let events = state.store.query_range(&range).await?;
    tracing::debug!(range = selector.token(), count = events.len(), "stats query");

    let response = match params.chart.as_deref() {
        Some(token) => {
            let summary = SummaryKind::parse(token)?.compute(&events);
            Json(summary).into_response()
        }
        None => Json(DashboardSummaries::build(&events)).into_response(),
    };
    Ok(response)
}

/// Raw events in the original API shape, for producers that still
/// post-process client-side.
async fn raw_events_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<StatsQuery>,
) -> Result<Response, StatsErrorResponse> {
    authorize(state.authorizer.as_ref(), &headers)?;

    let selector = RangeSelector::parse(params.range.as_deref())?;
    let range = selector.bounds(Utc::now());
    let events = state.store.query_range(&range).await?;

    Ok(Json(events).into_response())
}

async fn health_handler(
    State(state): State<AppState>,
) -> Result<Response, StatsErrorResponse> {
    let count = state.store.count().await?;
    let body = serde_json::json!({ "status": "ok", "events": count });
    Ok(Json(body).into_response())
}

/// Wrapper for StatsError that implements IntoResponse.
pub struct StatsErrorResponse(pub StatsError);

impl IntoResponse for StatsErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": self.0.status_code()
        });

        (status, Json(body)).into_response()
    }
}

impl From<StatsError> for StatsErrorResponse {
    fn from(err: StatsError) -> Self {
        StatsErrorResponse(err)
    }
}
