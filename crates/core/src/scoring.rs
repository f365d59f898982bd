//! Scoring module - points awarded for a line clear
//!
//! The policy is a trait so hosts can swap the formula; [`StandardScoring`]
//! uses the base table from `types` scaled by the summed row multipliers.

use crate::types::LINE_SCORES;

pub trait ScoringPolicy {
    /// Points for clearing `line_count` rows whose multipliers sum to `total_bonus_sum`.
    fn score_for(&self, line_count: usize, total_bonus_sum: u32) -> u64;
}

/// `LINE_SCORES[min(lines, 5)] * max(1, bonus_sum)`
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScoring;

impl ScoringPolicy for StandardScoring {
    fn score_for(&self, line_count: usize, total_bonus_sum: u32) -> u64 {
        let base = LINE_SCORES[line_count.min(LINE_SCORES.len() - 1)];
        base.saturating_mul(u64::from(total_bonus_sum.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_table() {
        let s = StandardScoring;
        assert_eq!(s.score_for(0, 0), 0);
        assert_eq!(s.score_for(1, 0), 100);
        assert_eq!(s.score_for(2, 0), 300);
        assert_eq!(s.score_for(3, 0), 500);
        assert_eq!(s.score_for(4, 0), 800);
        assert_eq!(s.score_for(5, 0), 1200);
        assert_eq!(s.score_for(8, 0), 1200);
    }

    #[test]
    fn test_bonus_scales_base() {
        let s = StandardScoring;
        assert_eq!(s.score_for(1, 1), 100);
        assert_eq!(s.score_for(1, 5), 500);
        assert_eq!(s.score_for(2, 12), 3600);
        assert_eq!(s.score_for(0, 10), 0);
    }
}
