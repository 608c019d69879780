//! Step log types.
//!
//! The step log is the append-only record of a player's actions, sufficient
//! to deterministically recompute the outcome. It is an explicit sum type
//! tagged on `"type"`, so an unrecognized variant fails deserialization
//! instead of falling through at runtime.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangular cell selection.
///
/// On the wire this is the 4-array `[start_col, end_col, start_row, end_row]`
/// as captured by the drag gesture; bounds may arrive in either order and
/// are normalized during replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct SelectBox {
    /// First selected column.
    pub start_col: i32,
    /// Last selected column.
    pub end_col: i32,
    /// First selected row.
    pub start_row: i32,
    /// Last selected row.
    pub end_row: i32,
}

impl SelectBox {
    /// Build a selection from explicit bounds.
    pub fn new(start_col: i32, end_col: i32, start_row: i32, end_row: i32) -> Self {
        Self {
            start_col,
            end_col,
            start_row,
            end_row,
        }
    }

    /// Normalized bounds `(min_col, max_col, min_row, max_row)`.
    pub fn normalized(&self) -> (i32, i32, i32, i32) {
        (
            self.start_col.min(self.end_col),
            self.start_col.max(self.end_col),
            self.start_row.min(self.end_row),
            self.start_row.max(self.end_row),
        )
    }
}

impl From<[i32; 4]> for SelectBox {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<SelectBox> for [i32; 4] {
    fn from(b: SelectBox) -> Self {
        [b.start_col, b.end_col, b.start_row, b.end_row]
    }
}

/// One entry of the step log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GameStep {
    /// An attempted clear of a rectangular region.
    #[serde(rename_all = "camelCase")]
    Pop {
        /// The selected rectangle.
        #[serde(rename = "box")]
        select: SelectBox,
        /// Board generation this pop was made against.
        reset_index: u32,
        /// Milliseconds since game start.
        time: u64,
    },
    /// A board regeneration event (no valid 10-sum region remained).
    #[serde(rename_all = "camelCase")]
    Reset {
        /// Board generation now in force; must be exactly one past the previous.
        reset_index: u32,
        /// Milliseconds since game start.
        time: u64,
    },
}

impl GameStep {
    /// Timestamp of this step in milliseconds since game start.
    pub fn time(&self) -> u64 {
        match self {
            GameStep::Pop { time, .. } | GameStep::Reset { time, .. } => *time,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_wire_format() {
        let json = r#"{"type":"pop","box":[2,3,0,0],"resetIndex":0,"time":1500}"#;
        let step: GameStep = serde_json::from_str(json).unwrap();

        assert_eq!(
            step,
            GameStep::Pop {
                select: SelectBox::new(2, 3, 0, 0),
                reset_index: 0,
                time: 1500,
            }
        );

        // Round-trips to the same shape
        let back = serde_json::to_string(&step).unwrap();
        let again: GameStep = serde_json::from_str(&back).unwrap();
        assert_eq!(step, again);
    }

    #[test]
    fn test_reset_wire_format() {
        let json = r#"{"type":"reset","resetIndex":1,"time":42000}"#;
        let step: GameStep = serde_json::from_str(json).unwrap();

        assert_eq!(
            step,
            GameStep::Reset {
                reset_index: 1,
                time: 42000,
            }
        );
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let json = r#"{"type":"undo","time":10}"#;
        assert!(serde_json::from_str::<GameStep>(json).is_err());
    }

    #[test]
    fn test_malformed_box_rejected() {
        // Box must be exactly 4 numbers
        let json = r#"{"type":"pop","box":[2,3,0],"resetIndex":0,"time":0}"#;
        assert!(serde_json::from_str::<GameStep>(json).is_err());
    }

    #[test]
    fn test_normalized_swaps_bounds() {
        let select = SelectBox::new(7, 2, 9, 4);
        assert_eq!(select.normalized(), (2, 7, 4, 9));
    }
}
