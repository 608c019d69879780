//! Durable state: sessions, scores, and the request limiter.
//!
//! Everything here is owned by the service instance and shared across
//! concurrently handled requests; all mutation happens under per-store
//! locks. The replay verification itself never touches this module.

pub mod rate_limit;
pub mod scores;
pub mod session;

pub use rate_limit::RateLimiter;
pub use scores::ScoreLedger;
pub use session::{GameSession, SessionError, SessionStore};
