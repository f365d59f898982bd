//! Bonus assigner - per-row random multipliers
//!
//! Every board cell is marked bonus-eligible (or not) when it is created. When a
//! piece locks onto an eligible cell the row gets one chance to draw a
//! multiplier from [`BONUS_TIERS`]. A row that already holds a multiplier is
//! never drawn again until it is cleared and evicted from the assigned set.

use std::collections::BTreeSet;

use tracing::trace;

use crate::rng::{GameRng, BONUS_STREAM};

/// Cumulative thresholds over a roll in `[0, 100)`.
///
/// The first tier whose threshold exceeds the roll wins; rolls at or past the
/// last threshold draw no bonus. Overall about 8.2% of draws are nonzero.
pub const BONUS_TIERS: [(f64, u8); 5] = [(3.5, 2), (5.5, 3), (7.0, 4), (8.0, 5), (8.2, 10)];

/// Every value [`BonusAssigner::assign_bonus`] can return.
pub const BONUS_VALUES: [u8; 6] = [0, 2, 3, 4, 5, 10];

/// Map a roll in `[0, 100)` to a multiplier (0 = none).
pub fn multiplier_for(roll: f64) -> u8 {
    BONUS_TIERS
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map_or(0, |&(_, multiplier)| multiplier)
}

#[derive(Debug, Clone)]
pub struct BonusAssigner {
    assigned: BTreeSet<usize>,
    eligibility_percent: f64,
    rng: GameRng,
}

impl BonusAssigner {
    pub fn new(seed: u64, eligibility_percent: f64) -> Self {
        Self {
            assigned: BTreeSet::new(),
            eligibility_percent,
            rng: GameRng::for_stream(seed, BONUS_STREAM),
        }
    }

    pub fn eligibility_percent(&self) -> f64 {
        self.eligibility_percent
    }

    /// Draw the eligibility flag of one freshly created cell.
    pub fn mark_eligible(&mut self) -> bool {
        self.rng.percent() < self.eligibility_percent
    }

    /// Draw a multiplier, ignoring the assigned set.
    pub fn draw_multiplier(&mut self) -> u8 {
        multiplier_for(self.rng.percent())
    }

    /// Draw a multiplier for `row` unless it already holds one.
    ///
    /// Returns 0 without drawing for an assigned row. A nonzero draw records
    /// the row; a zero draw leaves it free for the next lock.
    pub fn assign_bonus(&mut self, row: usize) -> u8 {
        if self.assigned.contains(&row) {
            return 0;
        }
        let multiplier = self.draw_multiplier();
        if multiplier > 0 {
            self.assigned.insert(row);
            trace!(row, multiplier, "bonus assigned");
        }
        multiplier
    }

    pub fn is_assigned(&self, row: usize) -> bool {
        self.assigned.contains(&row)
    }

    pub fn assigned_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.assigned.iter().copied()
    }

    /// Forget the assignment of a cleared row. Returns true if it was assigned.
    pub fn evict_row(&mut self, row: usize) -> bool {
        self.assigned.remove(&row)
    }

    /// Clear all assignments (new game).
    pub fn reset(&mut self) {
        self.assigned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(multiplier_for(0.0), 2);
        assert_eq!(multiplier_for(3.49), 2);
        assert_eq!(multiplier_for(3.5), 3);
        assert_eq!(multiplier_for(5.5), 4);
        assert_eq!(multiplier_for(7.0), 5);
        assert_eq!(multiplier_for(8.0), 10);
        assert_eq!(multiplier_for(8.19), 10);
        assert_eq!(multiplier_for(8.2), 0);
        assert_eq!(multiplier_for(99.9), 0);
    }

    #[test]
    fn test_draws_stay_in_value_set() {
        let mut assigner = BonusAssigner::new(5, 94.0);
        for _ in 0..10_000 {
            assert!(BONUS_VALUES.contains(&assigner.draw_multiplier()));
        }
    }

    #[test]
    fn test_nonzero_frequency_near_eight_percent() {
        let mut assigner = BonusAssigner::new(2024, 94.0);
        let draws = 200_000;
        let hits = (0..draws)
            .filter(|_| assigner.draw_multiplier() > 0)
            .count();
        let rate = hits as f64 / draws as f64;
        assert!((0.075..0.089).contains(&rate), "rate = {rate}");
    }

    #[test]
    fn test_assigned_row_never_redraws_until_evicted() {
        let mut assigner = BonusAssigner::new(11, 94.0);
        let mut first = 0;
        for _ in 0..10_000 {
            first = assigner.assign_bonus(3);
            if first > 0 {
                break;
            }
        }
        assert!(first > 0);
        assert!(assigner.is_assigned(3));
        for _ in 0..1_000 {
            assert_eq!(assigner.assign_bonus(3), 0);
        }

        assert!(assigner.evict_row(3));
        assert!(!assigner.is_assigned(3));
        let redrawn = (0..10_000).any(|_| assigner.assign_bonus(3) > 0);
        assert!(redrawn);
    }

    #[test]
    fn test_zero_draw_does_not_record_row() {
        let mut assigner = BonusAssigner::new(8, 94.0);
        for _ in 0..1_000 {
            if assigner.assign_bonus(1) == 0 {
                assert!(!assigner.is_assigned(1));
            } else {
                break;
            }
        }
    }

    #[test]
    fn test_eligibility_extremes() {
        let mut never = BonusAssigner::new(1, 0.0);
        let mut always = BonusAssigner::new(1, 100.0);
        for _ in 0..1_000 {
            assert!(!never.mark_eligible());
            assert!(always.mark_eligible());
        }
    }

    #[test]
    fn test_reset_clears_assignments() {
        let mut assigner = BonusAssigner::new(4, 94.0);
        for row in 0..200 {
            assigner.assign_bonus(row);
        }
        assert!(assigner.assigned_rows().count() > 0);
        assigner.reset();
        assert_eq!(assigner.assigned_rows().count(), 0);
    }
}
