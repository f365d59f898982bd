//! Bonus banner - the "xN" overlay shown after a bonus clear - and the
//! shorter "+N" points popup of every line clear.

use crate::snapshot::LineScore;

/// Countdown state of the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BonusBanner {
    multiplier: u32,
    remaining_ms: u64,
}

impl BonusBanner {
    /// Show `multiplier` for `duration_ms`, restarting any running countdown.
    pub fn show(&mut self, multiplier: u32, duration_ms: u32) {
        self.multiplier = multiplier;
        self.remaining_ms = u64::from(duration_ms);
    }

    /// Count down. Returns true on the step that hides the banner.
    pub fn advance(&mut self, delta_ms: u64) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
        !self.is_active()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn text(&self) -> Option<String> {
        self.is_active().then(|| format!("x{}", self.multiplier))
    }
}

/// Countdown for the points of the last clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineScorePopup {
    score: Option<LineScore>,
    remaining_ms: u64,
}

impl LineScorePopup {
    pub fn show(&mut self, row: usize, points: u64, duration_ms: u32) {
        self.score = Some(LineScore { row, points });
        self.remaining_ms = u64::from(duration_ms);
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
        if self.remaining_ms == 0 {
            self.score = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn current(&self) -> Option<LineScore> {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_counts_down_once() {
        let mut banner = BonusBanner::default();
        assert_eq!(banner.text(), None);

        banner.show(12, 5000);
        assert_eq!(banner.text().as_deref(), Some("x12"));
        assert!(!banner.advance(4000));
        assert!(banner.advance(1000));
        assert!(!banner.advance(1000));
        assert_eq!(banner.text(), None);
    }

    #[test]
    fn test_line_score_popup_expires() {
        let mut popup = LineScorePopup::default();
        popup.show(20, 300, 1000);
        popup.advance(600);
        assert_eq!(popup.current(), Some(LineScore { row: 20, points: 300 }));
        popup.advance(400);
        assert_eq!(popup.current(), None);
    }

    #[test]
    fn test_show_restarts_countdown() {
        let mut banner = BonusBanner::default();
        banner.show(2, 5000);
        banner.advance(4500);
        banner.show(3, 5000);
        assert_eq!(banner.remaining_ms(), 5000);
        assert_eq!(banner.multiplier(), 3);
    }
}
