//! Line clear engine
//!
//! Completed rows are found top to bottom, their bonus multipliers are summed,
//! then they are removed and the same number of fresh rows is pushed in at the
//! top. The board height never changes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::bonus::BonusAssigner;

/// Result of one line-clear pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClearReport {
    /// Indices of the cleared rows, top to bottom, as they were before removal.
    pub cleared_rows: Vec<usize>,
    /// Sum of the nonzero bonus multipliers found in the cleared rows.
    pub total_bonus_multiplier_sum: u32,
    /// Number of cells that carried a nonzero multiplier.
    pub bonus_cell_count: u32,
    pub line_count: usize,
}

impl LineClearReport {
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// Clear every completed row of `board`.
///
/// Cleared row indices are evicted from the assigner's assigned set. Refilled
/// rows get fresh eligibility marks drawn from the assigner.
pub fn process_completed_lines(board: &mut Board, assigner: &mut BonusAssigner) -> LineClearReport {
    let cleared_rows = board.full_rows();
    if cleared_rows.is_empty() {
        return LineClearReport::default();
    }

    let mut report = LineClearReport {
        line_count: cleared_rows.len(),
        ..LineClearReport::default()
    };

    for &y in &cleared_rows {
        assigner.evict_row(y);
        for cell in board.row(y).iter().filter(|c| c.bonus > 0) {
            report.total_bonus_multiplier_sum += u32::from(cell.bonus);
            report.bonus_cell_count += 1;
        }
    }

    board.remove_rows(&cleared_rows, || assigner.mark_eligible());

    debug!(
        lines = report.line_count,
        bonus_sum = report.total_bonus_multiplier_sum,
        "rows cleared"
    );
    report.cleared_rows = cleared_rows;
    report
}
