//! HTTP surface.
//!
//! Two write endpoints (`/start-session`, `/submit-score`) plus a read
//! endpoint for the leaderboard. Transport concerns only; all game rules
//! live in [`crate::game`].

pub mod protocol;
pub mod server;

pub use protocol::ApiError;
pub use server::{router, run_server, AppState};
