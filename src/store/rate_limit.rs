//! Per-address session-creation rate limiting.
//!
//! Process-local fixed-window counters. State lives for the lifetime of
//! the service instance and resets on restart; a horizontally scaled
//! deployment would need a shared counter store behind the same contract
//! (admit at most N per window per key).

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;

/// Default requests admitted per address per window.
pub const DEFAULT_MAX_PER_WINDOW: u32 = 10;

/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Caller exceeded the window's budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("too many requests from this address")]
pub struct RateLimited;

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Admits at most N requests per rolling window per client address.
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    entries: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_per_window` requests per `window`.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one request from `addr`.
    ///
    /// The read and the increment happen under one lock so concurrent
    /// requests cannot lose updates. A new window starts automatically
    /// once the previous one's reset time has passed.
    pub async fn check(&self, addr: IpAddr) -> Result<(), RateLimited> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.get_mut(&addr) {
            Some(window) if now < window.reset_at => {
                if window.count >= self.max_per_window {
                    return Err(RateLimited);
                }
                window.count += 1;
                Ok(())
            }
            _ => {
                entries.insert(
                    addr,
                    Window {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                Ok(())
            }
        }
    }

    /// Number of addresses currently tracked.
    pub async fn tracked_addresses(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW)
    }
}

// =============================================================================
// TESTS
// =============================================================================
