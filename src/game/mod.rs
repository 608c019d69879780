//! Replay verification.
//!
//! Deterministic, storage-free: given `(master_seed, step_log)` the
//! verdict is always the same.

pub mod replay;
pub mod step;

pub use replay::{validate, ReplayError};
pub use step::{GameStep, SelectBox};
