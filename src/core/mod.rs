//! Deterministic primitives.
//!
//! Everything in this module is a pure function of its inputs. The client
//! renders boards from the same algorithms, so any change here breaks
//! replay verification for sessions already in flight.

pub mod board;
pub mod rng;
pub mod seed;

pub use board::{Board, PoppedMask, GRID_COLS, GRID_ROWS};
pub use rng::SeededRng;
pub use seed::derive_master_seed;
