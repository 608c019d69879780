//! # Gridpop Verification Server
//!
//! Server-side verification for the Gridpop grid-matching game.
//! An untrusted client plays locally and submits a step log; this crate
//! replays that log against boards derived from the session seed and
//! recomputes the score from raw inputs alone.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    GRIDPOP SERVER                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - mulberry32 PRNG (client-identical)        │
//! │  ├── board.rs    - Seeded board generation                   │
//! │  └── seed.rs     - Master seed derivation                    │
//! │                                                              │
//! │  game/           - Replay verification (deterministic)       │
//! │  ├── step.rs     - Step log types (pop / reset)              │
//! │  └── replay.rs   - Step-log replay and score recomputation   │
//! │                                                              │
//! │  store/          - Durable state (non-deterministic)         │
//! │  ├── session.rs  - Single-use play sessions                  │
//! │  ├── scores.rs   - Per-nickname leaderboard                  │
//! │  └── rate_limit.rs - Per-address request limiter             │
//! │                                                              │
//! │  network/        - HTTP surface                              │
//! │  ├── server.rs   - axum router and handlers                  │
//! │  └── protocol.rs - Wire types and error mapping              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - All randomness from the seeded mulberry32 PRNG
//! - No system time dependencies
//! - No storage access during replay
//!
//! Given the same `(master_seed, step_log)`, the replay produces an
//! **identical verdict** on every run. This identity is what makes
//! replay verification possible: the client and the validator call the
//! same board generator and must see bit-identical grids.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;
pub mod store;

// Re-export commonly used types
pub use crate::core::board::{Board, PoppedMask, GRID_COLS, GRID_ROWS, TILE_MAX, TILE_MIN};
pub use crate::core::rng::SeededRng;
pub use crate::game::replay::{validate, ReplayError};
pub use crate::game::step::{GameStep, SelectBox};
pub use crate::store::session::{GameSession, SessionStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target sum a popped rectangle must reach exactly.
pub const TARGET_SUM: u32 = 10;

/// Game duration in seconds.
pub const GAME_TIME_SECS: u32 = 90;

/// Game duration in milliseconds (upper bound for step timestamps).
pub const GAME_TIME_MS: u64 = GAME_TIME_SECS as u64 * 1000;

/// Maximum number of entries accepted in a step log.
pub const MAX_STEPS: usize = 500;

/// Upper bound for a claimed score.
pub const MAX_CLAIMED_SCORE: u32 = 500;

/// Maximum nickname length in characters.
pub const NICKNAME_MAX_LEN: usize = 20;
