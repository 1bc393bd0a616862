//! HTTP surface for source debug lookups.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use source_probe_core::{DebugError, DebugLookup, DebugRequest};
use tower_http::trace::TraceLayer;

pub const DEBUG_SOURCE_PATH: &str = "/api/debugSource";

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<DebugLookup>,
}

impl AppState {
    pub fn new(lookup: DebugLookup) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

/// Raw query string of `GET /api/debugSource`. Everything is optional here so
/// that missing or odd values reach the lookup's own validation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DebugSourceParams {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub pg: Option<String>,
}

impl DebugSourceParams {
    /// Collect `q`, `type` and `pg`. A repeated parameter keeps its first
    /// value; unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "q" => &mut params.q,
                "type" => &mut params.kind,
                "pg" => &mut params.pg,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

impl From<DebugSourceParams> for DebugRequest {
    fn from(p: DebugSourceParams) -> Self {
        DebugRequest::from_raw(p.q.as_deref(), p.kind.as_deref(), p.pg.as_deref())
    }
}

/// Lookup error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DebugError);

impl From<DebugError> for ApiError {
    fn from(e: DebugError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}

/// GET /api/debugSource?q=91md&type=custom&pg=1
pub async fn debug_source(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = DebugRequest::from(DebugSourceParams::from_pairs(pairs));
    let envelope = state.lookup.run(&request).await?;
    Ok((StatusCode::OK, Json(envelope)))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(DEBUG_SOURCE_PATH, get(debug_source))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_parameters_keep_first_value() {
        let params = DebugSourceParams::from_pairs(pairs(&[
            ("q", "91md"),
            ("pg", "2"),
            ("q", "other"),
            ("pg", "9"),
        ]));
        assert_eq!(params.q.as_deref(), Some("91md"));
        assert_eq!(params.pg.as_deref(), Some("2"));
        assert_eq!(params.kind, None);
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let params = DebugSourceParams::from_pairs(pairs(&[("type", "custom"), ("debug", "1")]));
        assert_eq!(params.kind.as_deref(), Some("custom"));
        assert_eq!(params.q, None);
    }
}
