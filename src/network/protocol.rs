//! Wire types and error mapping.
//!
//! Request/response bodies are camelCase JSON. Every rejection carries a
//! stable machine-readable `error` code; replay rejections additionally
//! carry details (such as the mismatched sum) where useful. Storage
//! failures surface as a generic server error with detail logged
//! server-side only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::game::replay::ReplayError;
use crate::store::scores::ScoreRecord;
use crate::store::session::SessionError;

/// Response body for `POST /start-session`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    /// Opaque single-use session token.
    pub session_id: Uuid,
    /// Seed the client must derive all boards from.
    pub master_seed: u32,
}

/// Request body for `POST /submit-score`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    /// Session token from `/start-session`.
    pub session_id: String,
    /// Caller-supplied identity, first-come-first-served.
    pub nickname: String,
    /// The raw step log recorded during play.
    pub steps: Vec<crate::game::step::GameStep>,
    /// Score the client claims to have reached.
    pub claimed_score: u32,
    /// Seconds to full clear, if the board was fully cleared.
    #[serde(default)]
    pub claimed_clear_time: Option<f64>,
}

/// A leaderboard row on the wire.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Player nickname.
    pub nickname: String,
    /// Best verified score.
    pub score: u32,
    /// Clear time in seconds, if any run fully cleared the board.
    pub clear_time: Option<f64>,
    /// When the row last improved.
    pub updated_at: DateTime<Utc>,
}

impl From<ScoreRecord> for ScoreEntry {
    fn from(r: ScoreRecord) -> Self {
        Self {
            nickname: r.nickname,
            score: r.score,
            clear_time: r.clear_time,
            updated_at: r.updated_at,
        }
    }
}

/// Response body for a fully accepted submission.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    /// Always `true`; rejections use the error body instead.
    pub accepted: bool,
    /// The ledger row after the submission.
    pub record: ScoreEntry,
    /// Whether this submission set a new personal best.
    pub is_new_record: bool,
    /// Previous best for the nickname, if it existed.
    pub previous_score: Option<u32>,
    /// 1-based rank of the verified score.
    pub rank: usize,
    /// Total number of ledger rows.
    pub total_players: usize,
}

/// Response body for `GET /leaderboard`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    /// Rows, best scores first.
    pub entries: Vec<ScoreEntry>,
    /// Total number of ledger rows.
    pub total_players: usize,
}

/// Anything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed to parse into the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Session id is not a valid uuid.
    #[error("invalid session id")]
    InvalidSessionId,

    /// Replay or precondition rejection.
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// Session lifecycle rejection.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A storage call exceeded its budget or failed internally.
    #[error("storage failure")]
    Storage(String),
}

impl ApiError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "malformed_body",
            Self::InvalidSessionId => "invalid_session_id",
            Self::Replay(e) => e.code(),
            Self::Session(SessionError::NotFound) => "session_not_found",
            Self::Session(SessionError::Expired) => "session_expired",
            Self::Session(SessionError::AlreadyUsed) => "session_already_used",
            Self::Session(SessionError::RateLimited) => "rate_limited",
            Self::Storage(_) => "storage_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) | Self::InvalidSessionId | Self::Replay(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Session(SessionError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            Self::Session(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured detail for rejections where the code alone is not enough.
    fn details(&self) -> Option<Value> {
        let Self::Replay(e) = self else { return None };
        match e {
            ReplayError::SumMismatch { sum } => {
                Some(json!({ "sum": sum, "expected": crate::TARGET_SUM }))
            }
            ReplayError::ScoreMismatch {
                calculated,
                claimed,
            } => Some(json!({ "calculated": calculated, "claimed": claimed })),
            ReplayError::ResetOutOfSequence { expected, got }
            | ReplayError::PopStaleBoard { expected, got } => {
                Some(json!({ "expected": expected, "got": got }))
            }
            ReplayError::TooManySteps { count } => {
                Some(json!({ "count": count, "max": crate::MAX_STEPS }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal detail stays in the server log
        let message = match &self {
            ApiError::Storage(detail) => {
                tracing::error!(%detail, "storage failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.code(),
            "message": message,
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================
