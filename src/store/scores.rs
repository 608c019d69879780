//! Per-nickname leaderboard.
//!
//! One row per nickname; the stored score is monotonically non-decreasing.
//! The nickname is the only identity concept, first-come-first-served.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A leaderboard row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Unique key.
    pub nickname: String,
    /// Best verified score so far.
    pub score: u32,
    /// Clear time in seconds, if the board was fully cleared.
    pub clear_time: Option<f64>,
    /// When the row was first inserted.
    pub created_at: DateTime<Utc>,
    /// When the row last improved.
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a record attempt.
#[derive(Clone, Debug)]
pub struct RecordOutcome {
    /// The row after the attempt (updated or left as it was).
    pub record: ScoreRecord,
    /// Whether the submission set a new personal best.
    pub is_new_record: bool,
    /// The previous best, if the nickname existed.
    pub previous_score: Option<u32>,
}

/// Upserts validated scores and answers rank queries.
pub struct ScoreLedger {
    rows: RwLock<BTreeMap<String, ScoreRecord>>,
}

impl ScoreLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Record `score` for `nickname` if it beats the stored best.
    ///
    /// Inserts on first sight; overwrites only on a strictly greater
    /// score; otherwise leaves the row untouched and reports the
    /// existing best.
    pub async fn record_if_higher(
        &self,
        nickname: &str,
        score: u32,
        clear_time: Option<f64>,
    ) -> RecordOutcome {
        let now = Utc::now();
        let mut rows = self.rows.write().await;

        match rows.get_mut(nickname) {
            Some(existing) => {
                let previous = existing.score;
                if score > previous {
                    existing.score = score;
                    existing.clear_time = clear_time;
                    existing.updated_at = now;
                    RecordOutcome {
                        record: existing.clone(),
                        is_new_record: true,
                        previous_score: Some(previous),
                    }
                } else {
                    RecordOutcome {
                        record: existing.clone(),
                        is_new_record: false,
                        previous_score: Some(previous),
                    }
                }
            }
            None => {
                let record = ScoreRecord {
                    nickname: nickname.to_string(),
                    score,
                    clear_time,
                    created_at: now,
                    updated_at: now,
                };
                rows.insert(nickname.to_string(), record.clone());
                RecordOutcome {
                    record,
                    is_new_record: true,
                    previous_score: None,
                }
            }
        }
    }

    /// Rank for a score: strictly greater rows + 1, plus the total row
    /// count. Tied scores share the same rank number.
    pub async fn rank(&self, score: u32) -> (usize, usize) {
        let rows = self.rows.read().await;
        let higher = rows.values().filter(|r| r.score > score).count();
        (higher + 1, rows.len())
    }

    /// Case-insensitive substring search, best scores first.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<ScoreRecord> {
        let needle = query.to_lowercase();
        let rows = self.rows.read().await;

        let mut hits: Vec<ScoreRecord> = rows
            .values()
            .filter(|r| r.nickname.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        sort_leaderboard(&mut hits);
        hits.truncate(limit);
        hits
    }

    /// Top `limit` rows, best scores first.
    pub async fn top(&self, limit: usize) -> Vec<ScoreRecord> {
        let rows = self.rows.read().await;
        let mut all: Vec<ScoreRecord> = rows.values().cloned().collect();
        sort_leaderboard(&mut all);
        all.truncate(limit);
        all
    }
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Score descending, then clear time ascending with absent times last.
fn sort_leaderboard(rows: &mut [ScoreRecord]) {
    rows.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| match (a.clear_time, b.clear_time) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
    });
}

// =============================================================================
// TESTS
// =============================================================================
