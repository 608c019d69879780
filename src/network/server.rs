//! HTTP server.
//!
//! axum router binding the verification engine to its two write endpoints
//! plus leaderboard reads. Both endpoints are safe behind permissive CORS:
//! there is no per-user identity beyond the caller-supplied nickname.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use tokio::time::timeout;
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::game::replay;
use crate::network::protocol::{
    ApiError, LeaderboardResponse, StartSessionResponse, SubmitScoreRequest, SubmitScoreResponse,
};
use crate::store::rate_limit::RateLimiter;
use crate::store::scores::ScoreLedger;
use crate::store::session::SessionStore;
use crate::VERSION;

/// Default number of rows returned by the leaderboard endpoint.
const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

/// Largest leaderboard page a single request may ask for.
const MAX_LEADERBOARD_LIMIT: usize = 200;

/// Shared service state: the stores and their operating budgets.
#[derive(Clone)]
pub struct AppState {
    /// Issued play sessions.
    pub sessions: Arc<SessionStore>,
    /// The per-nickname leaderboard.
    pub scores: Arc<ScoreLedger>,
    /// Budget for any single storage call.
    pub storage_timeout: Duration,
}

impl AppState {
    /// Build service state from configuration.
    pub fn new(config: &ServerConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_per_minute,
            Duration::from_secs(60),
        ));
        Self {
            sessions: Arc::new(SessionStore::new(rate_limiter)),
            scores: Arc::new(ScoreLedger::new()),
            storage_timeout: config.storage_timeout,
        }
    }
}

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/start-session", post(start_session))
        .route("/submit-score", post(submit_score))
        .route("/leaderboard", get(leaderboard))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config.listen_addr.parse()?;
    let state = AppState::new(&config);
    let app = router(state);

    info!(%addr, "gridpop server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Fail a storage call that exceeds its budget instead of hanging.
async fn with_storage_timeout<T, E>(
    budget: Duration,
    fut: impl Future<Output = Result<T, E>>,
) -> Result<Result<T, E>, ApiError> {
    timeout(budget, fut)
        .await
        .map_err(|_| ApiError::Storage("storage call timed out".to_string()))
}

/// Client address for rate limiting: forwarded header first, then the
/// socket peer.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| peer.ip())
}

// =============================================================================
// Handlers
// =============================================================================

async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "version": VERSION }))
}

async fn start_session(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let addr = client_ip(&headers, peer);

    let session =
        with_storage_timeout(state.storage_timeout, state.sessions.create(addr)).await??;

    info!(session_id = %session.id, client = %addr, "session issued");

    Ok(Json(StartSessionResponse {
        session_id: session.id,
        master_seed: session.master_seed,
    }))
}

async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    let session_id = Uuid::parse_str(&req.session_id).map_err(|_| ApiError::InvalidSessionId)?;

    // Fetch the seed; usability (absent / expired / used) fails here already
    let session =
        with_storage_timeout(state.storage_timeout, state.sessions.get(&session_id)).await??;

    // The replay is pure and synchronous; nothing is written until it passes
    let calculated = replay::validate(
        session.master_seed,
        &req.nickname,
        &req.steps,
        req.claimed_score,
        req.claimed_clear_time,
    )?;

    // The session, not the math, is the authority on submission uniqueness:
    // losing the consume race fails the whole submission
    with_storage_timeout(state.storage_timeout, state.sessions.consume(&session_id)).await??;

    let nickname = req.nickname.trim().to_string();
    let scores = state.scores.clone();
    let clear_time = req.claimed_clear_time;
    let (outcome, rank, total_players) = timeout(state.storage_timeout, async move {
        let outcome = scores
            .record_if_higher(&nickname, calculated, clear_time)
            .await;
        let (rank, total) = scores.rank(calculated).await;
        (outcome, rank, total)
    })
    .await
    .map_err(|_| ApiError::Storage("storage call timed out".to_string()))?;

    info!(
        session_id = %session_id,
        nickname = %outcome.record.nickname,
        score = calculated,
        is_new_record = outcome.is_new_record,
        "submission accepted"
    );

    Ok(Json(SubmitScoreResponse {
        accepted: true,
        record: outcome.record.into(),
        is_new_record: outcome.is_new_record,
        previous_score: outcome.previous_score,
        rank,
        total_players,
    }))
}

#[derive(Debug, Deserialize)]
struct LeaderboardParams {
    search: Option<String>,
    limit: Option<usize>,
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .min(MAX_LEADERBOARD_LIMIT);

    let entries = match params.search.as_deref() {
        Some(query) if !query.trim().is_empty() => {
            state.scores.search(query.trim(), limit).await
        }
        _ => state.scores.top(limit).await,
    };

    let (_, total_players) = state.scores.rank(0).await;

    Ok(Json(LeaderboardResponse {
        entries: entries.into_iter().map(Into::into).collect(),
        total_players,
    }))
}

// =============================================================================
// TESTS
// =============================================================================
