//! Lock pipeline - what happens when a piece comes to rest
//!
//! [`LockPipeline`] is the [`MovementHooks`] implementation used by
//! [`GameState`](crate::GameState): it writes the piece into the board, rolls
//! row bonuses for the cells it covered, clears completed rows and plays the
//! matching cues. The last line-clear report is kept until the owner takes it.

use std::collections::BTreeMap;

use crate::audio::{line_clear_cue, AudioNotifier, SoundCue};
use crate::board::Board;
use crate::bonus::BonusAssigner;
use crate::line_clear::{process_completed_lines, LineClearReport};
use crate::movement::MovementHooks;
use crate::pieces::Piece;
use crate::types::Cell;

/// Write `piece` into `board` and roll row bonuses.
///
/// For each row the piece covers, the leftmost sub-cell landing on an eligible
/// cell gets one `assign_bonus` draw. Sub-cells above the board are dropped.
/// Returns the number of bonuses placed.
pub fn lock_piece(board: &mut Board, piece: &Piece, bonus: &mut BonusAssigner) -> usize {
    let mut bonus_slots: BTreeMap<i32, i32> = BTreeMap::new();

    for (x, y, value) in piece.cells() {
        let Some(cell) = board.get_mut(x, y) else {
            continue;
        };
        if cell.bonus_eligible {
            bonus_slots
                .entry(y)
                .and_modify(|slot| *slot = (*slot).min(x))
                .or_insert(x);
        }
        *cell = Cell {
            value,
            color: Some(piece.color),
            bonus: 0,
            bonus_eligible: cell.bonus_eligible,
        };
    }

    let mut placed = 0;
    for (y, x) in bonus_slots {
        let multiplier = bonus.assign_bonus(y as usize);
        if multiplier == 0 {
            continue;
        }
        if let Some(cell) = board.get_mut(x, y) {
            cell.bonus = multiplier;
            placed += 1;
        }
    }
    placed
}

pub struct LockPipeline {
    bonus: BonusAssigner,
    audio: Box<dyn AudioNotifier>,
    report: Option<LineClearReport>,
}

impl LockPipeline {
    pub fn new(bonus: BonusAssigner, audio: Box<dyn AudioNotifier>) -> Self {
        Self {
            bonus,
            audio,
            report: None,
        }
    }

    pub fn bonus(&self) -> &BonusAssigner {
        &self.bonus
    }

    pub fn bonus_mut(&mut self) -> &mut BonusAssigner {
        &mut self.bonus
    }

    pub fn audio_mut(&mut self) -> &mut dyn AudioNotifier {
        self.audio.as_mut()
    }

    /// Take the report of the most recent lock.
    pub fn take_report(&mut self) -> Option<LineClearReport> {
        self.report.take()
    }
}

impl MovementHooks for LockPipeline {
    fn cue(&mut self, cue: SoundCue) {
        self.audio.play(cue);
    }

    fn solidify(&mut self, board: &mut Board, piece: &Piece) {
        lock_piece(board, piece, &mut self.bonus);
    }

    fn remove_lines(&mut self, board: &mut Board) {
        let report = process_completed_lines(board, &mut self.bonus);
        if let Some(cue) = line_clear_cue(report.line_count) {
            self.audio.play(cue);
        }
        self.report = Some(report);
    }
}
