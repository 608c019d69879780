//! Step-log replay validation.
//!
//! Recomputes the score of a submitted game purely from the session's
//! master seed and the raw step log, then compares it against the claim.
//! No client-reported game state is trusted: boards are regenerated from
//! the seed, every pop is re-summed, and any inconsistency rejects the
//! whole submission. Rejections are deterministic and reproducible;
//! re-running the same inputs yields the same verdict.

use thiserror::Error;

use crate::core::board::{Board, PoppedMask, GRID_COLS, GRID_ROWS};
use crate::game::step::{GameStep, SelectBox};
use crate::{GAME_TIME_MS, GAME_TIME_SECS, MAX_CLAIMED_SCORE, MAX_STEPS, NICKNAME_MAX_LEN, TARGET_SUM};

/// Why a submission was rejected.
///
/// Every variant carries enough detail for a machine-readable wire error;
/// [`code`](Self::code) gives the stable identifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// Nickname is empty after trimming.
    #[error("nickname is empty")]
    EmptyNickname,

    /// Nickname exceeds the length cap.
    #[error("nickname exceeds {max} characters", max = NICKNAME_MAX_LEN)]
    NicknameTooLong,

    /// Step log exceeds the entry cap.
    #[error("step log has {count} entries (max {max})", max = MAX_STEPS)]
    TooManySteps {
        /// Submitted entry count.
        count: usize,
    },

    /// Claimed score outside the accepted range.
    #[error("claimed score {claimed} outside 0..={max}", max = MAX_CLAIMED_SCORE)]
    ClaimedScoreOutOfRange {
        /// The out-of-range claim.
        claimed: u32,
    },

    /// Claimed clear time outside the game duration.
    #[error("claimed clear time {seconds}s outside 0..={max}", max = GAME_TIME_SECS)]
    ClearTimeOutOfRange {
        /// The out-of-range clear time in seconds.
        seconds: f64,
    },

    /// A step's timestamp went backwards.
    #[error("step time {time}ms is before previous step at {last}ms")]
    TimeReversed {
        /// Offending timestamp.
        time: u64,
        /// Timestamp of the previous step.
        last: u64,
    },

    /// A step's timestamp exceeds the game duration.
    #[error("step time {time}ms exceeds game duration {max}ms", max = GAME_TIME_MS)]
    TimeBeyondLimit {
        /// Offending timestamp.
        time: u64,
    },

    /// A reset step skipped or repeated a generation.
    #[error("reset index {got} out of sequence (expected {expected})")]
    ResetOutOfSequence {
        /// The only acceptable next index.
        expected: u32,
        /// Submitted index.
        got: u32,
    },

    /// A pop referenced a board generation no longer in force.
    #[error("pop references board generation {got} but {expected} is in force")]
    PopStaleBoard {
        /// Generation currently in force.
        expected: u32,
        /// Submitted generation.
        got: u32,
    },

    /// A pop's rectangle falls outside the grid.
    #[error("selection out of bounds: {select:?}")]
    BoxOutOfBounds {
        /// The offending selection.
        select: SelectBox,
    },

    /// A pop selected no remaining cells.
    #[error("selection contains no cells left to clear")]
    EmptySelection,

    /// A pop's cells summed to something other than the target.
    #[error("selection sums to {sum}, expected {target}", target = TARGET_SUM)]
    SumMismatch {
        /// The recomputed sum.
        sum: u32,
    },

    /// The recomputed score differs from the claim.
    #[error("calculated score {calculated} does not match claimed {claimed}")]
    ScoreMismatch {
        /// Score derived from the step log.
        calculated: u32,
        /// Score asserted by the client.
        claimed: u32,
    },
}

impl ReplayError {
    /// Stable machine-readable rejection code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyNickname => "empty_nickname",
            Self::NicknameTooLong => "nickname_too_long",
            Self::TooManySteps { .. } => "too_many_steps",
            Self::ClaimedScoreOutOfRange { .. } => "score_out_of_range",
            Self::ClearTimeOutOfRange { .. } => "clear_time_out_of_range",
            Self::TimeReversed { .. } => "time_reversed",
            Self::TimeBeyondLimit { .. } => "time_beyond_limit",
            Self::ResetOutOfSequence { .. } => "reset_out_of_sequence",
            Self::PopStaleBoard { .. } => "pop_stale_board",
            Self::BoxOutOfBounds { .. } => "box_out_of_bounds",
            Self::EmptySelection => "empty_selection",
            Self::SumMismatch { .. } => "sum_mismatch",
            Self::ScoreMismatch { .. } => "score_mismatch",
        }
    }
}

/// Validate a submission end to end.
///
/// Checks the preconditions (nickname, log size, claim ranges), replays
/// the step log, and requires the recomputed score to equal the claim
/// exactly. Pure: no storage access, no side effects. Session consumption
/// is the caller's responsibility and happens only after this succeeds.
pub fn validate(
    master_seed: u32,
    nickname: &str,
    steps: &[GameStep],
    claimed_score: u32,
    claimed_clear_time: Option<f64>,
) -> Result<u32, ReplayError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(ReplayError::EmptyNickname);
    }
    if trimmed.chars().count() > NICKNAME_MAX_LEN {
        return Err(ReplayError::NicknameTooLong);
    }

    if steps.len() > MAX_STEPS {
        return Err(ReplayError::TooManySteps { count: steps.len() });
    }

    if claimed_score > MAX_CLAIMED_SCORE {
        return Err(ReplayError::ClaimedScoreOutOfRange {
            claimed: claimed_score,
        });
    }

    if let Some(seconds) = claimed_clear_time {
        if !seconds.is_finite() || seconds < 0.0 || seconds > GAME_TIME_SECS as f64 {
            return Err(ReplayError::ClearTimeOutOfRange { seconds });
        }
    }

    let calculated = replay(master_seed, steps)?;

    if calculated != claimed_score {
        return Err(ReplayError::ScoreMismatch {
            calculated,
            claimed: claimed_score,
        });
    }

    Ok(calculated)
}

/// Replay a step log and recompute its score.
///
/// The board in force starts at generation 0 and is regenerated on each
/// accepted reset; the popped mask tracks cleared cells per generation.
pub fn replay(master_seed: u32, steps: &[GameStep]) -> Result<u32, ReplayError> {
    let mut current_reset_index: u32 = 0;
    let mut board = Board::generate(master_seed, current_reset_index);
    let mut popped = PoppedMask::new();
    let mut calculated_score: u32 = 0;
    let mut last_time: u64 = 0;

    for step in steps {
        let time = step.time();
        if time < last_time {
            return Err(ReplayError::TimeReversed { time, last: last_time });
        }
        if time > GAME_TIME_MS {
            return Err(ReplayError::TimeBeyondLimit { time });
        }
        last_time = time;

        match *step {
            GameStep::Reset { reset_index, .. } => {
                // Resets are strictly sequential: one increment per reset
                if reset_index != current_reset_index + 1 {
                    return Err(ReplayError::ResetOutOfSequence {
                        expected: current_reset_index + 1,
                        got: reset_index,
                    });
                }
                current_reset_index = reset_index;
                board = Board::generate(master_seed, current_reset_index);
                popped.clear();
            }
            GameStep::Pop {
                select,
                reset_index,
                ..
            } => {
                // A pop must reference the board generation currently in force
                if reset_index != current_reset_index {
                    return Err(ReplayError::PopStaleBoard {
                        expected: current_reset_index,
                        got: reset_index,
                    });
                }

                let (min_col, max_col, min_row, max_row) = select.normalized();
                if min_col < 0
                    || max_col >= GRID_COLS as i32
                    || min_row < 0
                    || max_row >= GRID_ROWS as i32
                {
                    return Err(ReplayError::BoxOutOfBounds { select });
                }

                let mut sum: u32 = 0;
                let mut count: u32 = 0;
                for row in min_row as usize..=max_row as usize {
                    for col in min_col as usize..=max_col as usize {
                        if !popped.is_popped(row, col) {
                            sum += board.value(row, col) as u32;
                            count += 1;
                        }
                    }
                }

                if count == 0 {
                    return Err(ReplayError::EmptySelection);
                }
                if sum != TARGET_SUM {
                    return Err(ReplayError::SumMismatch { sum });
                }

                for row in min_row as usize..=max_row as usize {
                    for col in min_col as usize..=max_col as usize {
                        if !popped.is_popped(row, col) {
                            popped.pop(row, col);
                        }
                    }
                }
                calculated_score += count;
            }
        }
    }

    Ok(calculated_score)
}

// =============================================================================
// TESTS
// =============================================================================
