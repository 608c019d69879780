//! Play session lifecycle.
//!
//! A session is a short-lived, single-use authorization binding a master
//! seed to one play attempt. Created on request (rate limited), consumed
//! by at most one successful submission, swept long after expiry.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::core::seed::derive_master_seed;
use crate::store::rate_limit::RateLimiter;

/// How long a fresh session stays usable, in seconds.
const SESSION_TTL_SECS: i64 = 3 * 60;

/// How long an expired session is retained before the sweep removes it,
/// in seconds.
const SESSION_RETENTION_SECS: i64 = 24 * 60 * 60;

/// A single play session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    /// Opaque unique token handed to the client.
    pub id: Uuid,
    /// Seed fixing the entire deterministic sequence of boards.
    pub master_seed: u32,
    /// When the session was issued.
    pub created_at: DateTime<Utc>,
    /// Fixed at creation; the session is unusable past this instant.
    pub expires_at: DateTime<Utc>,
    /// Set exactly once by the first successful submission; never reverts.
    pub used_at: Option<DateTime<Utc>>,
}

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No session with the given id.
    #[error("session not found")]
    NotFound,

    /// Session exists but is past its expiry.
    #[error("session expired")]
    Expired,

    /// Session was already consumed by a successful submission.
    #[error("session already used")]
    AlreadyUsed,

    /// Caller exceeded the session-creation rate limit.
    #[error("rate limited")]
    RateLimited,
}

/// Durable record of issued play sessions.
///
/// Backed by an in-process map under a single `RwLock`; the conditional
/// mark-used in [`consume`](Self::consume) runs inside one write-lock
/// critical section, so two concurrent submissions for the same id cannot
/// both observe `used_at` as null.
pub struct SessionStore {
    sessions: RwLock<BTreeMap<Uuid, GameSession>>,
    rate_limiter: Arc<RateLimiter>,
}

impl SessionStore {
    /// Create a store that admits sessions through the given rate limiter.
    pub fn new(rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
            rate_limiter,
        }
    }

    /// Issue a new session for a client address.
    ///
    /// Consults the rate limiter first, then derives the master seed from
    /// the fresh session id and creation time. Stale sessions are swept as
    /// best-effort maintenance on the same write lock; sweep problems are
    /// logged, never fatal to the request.
    pub async fn create(&self, client_addr: IpAddr) -> Result<GameSession, SessionError> {
        self.rate_limiter
            .check(client_addr)
            .await
            .map_err(|_| SessionError::RateLimited)?;

        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let master_seed = derive_master_seed(
            &id,
            created_at.timestamp_nanos_opt().unwrap_or_default(),
        );

        let session = GameSession {
            id,
            master_seed,
            created_at,
            expires_at: created_at + Duration::seconds(SESSION_TTL_SECS),
            used_at: None,
        };

        let mut sessions = self.sessions.write().await;
        sweep_stale(&mut sessions, created_at);
        sessions.insert(id, session.clone());

        Ok(session)
    }

    /// Fetch a session that is still usable.
    ///
    /// Distinguishes absence, expiry, and prior use; does not mutate.
    pub async fn get(&self, id: &Uuid) -> Result<GameSession, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id).ok_or(SessionError::NotFound)?;

        if Utc::now() > session.expires_at {
            return Err(SessionError::Expired);
        }
        if session.used_at.is_some() {
            return Err(SessionError::AlreadyUsed);
        }

        Ok(session.clone())
    }

    /// Conditionally consume a session.
    ///
    /// Succeeds only if the session exists, is unexpired, and `used_at`
    /// was still null; the check and the write happen under one write
    /// lock, so at most one of two racing submissions wins.
    pub async fn consume(&self, id: &Uuid) -> Result<GameSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound)?;

        if Utc::now() > session.expires_at {
            return Err(SessionError::Expired);
        }
        if session.used_at.is_some() {
            return Err(SessionError::AlreadyUsed);
        }

        session.used_at = Some(Utc::now());
        Ok(session.clone())
    }

    /// Number of sessions currently held (including used and expired).
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Remove sessions whose expiry is past the retention window.
fn sweep_stale(sessions: &mut BTreeMap<Uuid, GameSession>, now: DateTime<Utc>) {
    let cutoff = now - Duration::seconds(SESSION_RETENTION_SECS);
    let before = sessions.len();
    sessions.retain(|_, s| s.expires_at >= cutoff);

    let removed = before - sessions.len();
    if removed > 0 {
        debug!(removed, "swept stale sessions");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn addr(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, last))
    }

    fn store() -> SessionStore {
        // Generous limit so lifecycle tests never trip it
        SessionStore::new(Arc::new(RateLimiter::new(
            1000,
            std::time::Duration::from_secs(60),
        )))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let session = store.create(addr(1)).await.unwrap();

        assert!(session.used_at.is_none());
        assert!(session.expires_at > session.created_at);

        let fetched = store.get(&session.id).await.unwrap();
        assert_eq!(fetched.master_seed, session.master_seed);
    }

    #[tokio::test]
    async fn test_seeds_differ_between_sessions() {
        let store = store();
        let a = store.create(addr(1)).await.unwrap();
        let b = store.create(addr(1)).await.unwrap();
        assert_ne!(a.id, b.id);
        // Ids differ, so derived seeds should too
        assert_ne!(a.master_seed, b.master_seed);
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let store = store();
        let result = store.get(&Uuid::new_v4()).await;
        assert_eq!(result.unwrap_err(), SessionError::NotFound);
    }

    #[tokio::test]
    async fn test_consume_marks_used() {
        let store = store();
        let session = store.create(addr(1)).await.unwrap();

        let consumed = store.consume(&session.id).await.unwrap();
        assert!(consumed.used_at.is_some());

        // A consumed session can be neither fetched nor consumed again
        assert_eq!(store.get(&session.id).await.unwrap_err(), SessionError::AlreadyUsed);
        assert_eq!(
            store.consume(&session.id).await.unwrap_err(),
            SessionError::AlreadyUsed
        );
    }

    #[tokio::test]
    async fn test_concurrent_consume_single_winner() {
        let store = Arc::new(store());
        let session = store.create(addr(1)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let id = session.id;
            handles.push(tokio::spawn(async move { store.consume(&id).await }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_expired_session_unusable() {
        let store = store();
        let session = store.create(addr(1)).await.unwrap();

        // Force expiry in place
        {
            let mut sessions = store.sessions.write().await;
            let s = sessions.get_mut(&session.id).unwrap();
            s.expires_at = Utc::now() - Duration::seconds(1);
        }

        assert_eq!(store.get(&session.id).await.unwrap_err(), SessionError::Expired);
        assert_eq!(
            store.consume(&session.id).await.unwrap_err(),
            SessionError::Expired
        );
    }

    #[tokio::test]
    async fn test_sweep_removes_long_expired() {
        let store = store();
        let old = store.create(addr(1)).await.unwrap();

        // Age the session past the retention window
        {
            let mut sessions = store.sessions.write().await;
            let s = sessions.get_mut(&old.id).unwrap();
            s.expires_at = Utc::now() - Duration::seconds(SESSION_RETENTION_SECS) - Duration::hours(1);
        }

        // Creation triggers the sweep
        store.create(addr(1)).await.unwrap();

        assert_eq!(store.count().await, 1);
        assert_eq!(store.get(&old.id).await.unwrap_err(), SessionError::NotFound);
    }

    #[tokio::test]
    async fn test_sweep_keeps_recently_expired() {
        let store = store();
        let recent = store.create(addr(1)).await.unwrap();

        // Expired, but inside the retention window
        {
            let mut sessions = store.sessions.write().await;
            let s = sessions.get_mut(&recent.id).unwrap();
            s.expires_at = Utc::now() - Duration::minutes(10);
        }

        store.create(addr(1)).await.unwrap();
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_create_rate_limited() {
        let limiter = Arc::new(RateLimiter::new(2, std::time::Duration::from_secs(60)));
        let store = SessionStore::new(limiter);

        store.create(addr(1)).await.unwrap();
        store.create(addr(1)).await.unwrap();
        assert_eq!(
            store.create(addr(1)).await.unwrap_err(),
            SessionError::RateLimited
        );

        // A different address is unaffected
        store.create(addr(2)).await.unwrap();
    }
}
