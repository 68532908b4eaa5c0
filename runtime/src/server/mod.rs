//! JSON HTTP API over the matching core.
//!
//! Registry access is serialized behind one mutex, so joins never race on
//! id assignment even when requests arrive concurrently.

use crate::error::MatchError;
use crate::matching::{GroupMatch, Matcher};
use crate::model::ClusterId;
use crate::profile::RawProfile;
use crate::registry::{MembershipRecord, MembershipStore, RecordId};
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared state for all handlers.
pub struct AppState {
    matcher: Matcher,
    registry: Mutex<Box<dyn MembershipStore>>,
}

impl AppState {
    pub fn new(matcher: Matcher, registry: impl MembershipStore + 'static) -> Self {
        Self {
            matcher,
            registry: Mutex::new(Box::new(registry)),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Box<dyn MembershipStore>> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub cluster_id: ClusterId,
    pub groups: Vec<GroupMatch>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(flatten)]
    pub profile: RawProfile,
    pub group_name: String,
    pub cluster_id: ClusterId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinResponse {
    pub id: RecordId,
    pub group_name: String,
    pub cluster_id: ClusterId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupQuery {
    pub group_name: String,
    pub cluster_id: ClusterId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupResponse {
    pub group_name: String,
    pub cluster_id: ClusterId,
    pub members: Vec<MembershipRecord>,
}

/// Error body: `{"error": kind, "message": text}`.
pub struct ApiError(MatchError);

impl From<MatchError> for ApiError {
    fn from(e: MatchError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            MatchError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("request failed: {}", self.0);
        }
        let body = serde_json::json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/match", post(match_groups))
        .route("/join", post(join_group))
        .route("/group", get(group_members))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("listening on {bind}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await
        .context("server error")
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let members = state.registry().len().unwrap_or(0);
    Json(serde_json::json!({
        "status": "ok",
        "members": members,
    }))
}

pub async fn match_groups(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<RawProfile>,
) -> Result<Json<MatchResponse>, ApiError> {
    let profile = raw.validate()?;
    let outcome = {
        let registry = state.registry();
        state.matcher.match_profile(&profile, &**registry)?
    };
    Ok(Json(MatchResponse {
        cluster_id: outcome.cluster_id,
        groups: outcome.rows(),
    }))
}

pub async fn join_group(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    let profile = req.profile.validate()?;
    let id = {
        let registry = state.registry();
        state
            .matcher
            .join(&profile, &req.group_name, req.cluster_id, &**registry)?
    };
    Ok(Json(JoinResponse {
        id,
        group_name: req.group_name.trim().to_string(),
        cluster_id: req.cluster_id,
    }))
}

pub async fn group_members(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GroupQuery>,
) -> Result<Json<GroupResponse>, ApiError> {
    let members = state
        .registry()
        .query_by_group_and_cluster(&q.group_name, q.cluster_id)?;
    Ok(Json(GroupResponse {
        group_name: q.group_name,
        cluster_id: q.cluster_id,
        members,
    }))
}
