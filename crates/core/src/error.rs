use thiserror::Error;

use crate::types::Difficulty;

/// Errors surfaced by game operations.
///
/// Collisions are never errors; they show up as [`MoveOutcome`](crate::movement::MoveOutcome)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid direction token: {0:?}")]
    InvalidDirection(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board {width}x{height} is smaller than the minimum side of {min}")]
    BoardTooSmall { width: u16, height: u16, min: u16 },
    #[error("board {width}x{height} is larger than the maximum side of {max}")]
    BoardTooLarge { width: u16, height: u16, max: u16 },
    #[error("{difficulty:?} pieces need at least a {min_width}x{min_height} board, got {width}x{height}")]
    PiecesDoNotFit {
        difficulty: Difficulty,
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
    #[error("bonus eligibility percent {0} is outside 0..=100")]
    EligibilityOutOfRange(f64),
    #[error("drop interval must be greater than zero")]
    ZeroDropInterval,
}
