//! Plain-data copies of the game state for renderers and recordings.

use serde::{Deserialize, Serialize};

use crate::clock::format_elapsed;
use crate::pieces::Piece;
use crate::types::{Cell, ColorToken, Difficulty, Position};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub rows: Vec<Vec<u8>>,
    pub color: ColorToken,
    pub position: Position,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            rows: piece.matrix.to_rows(),
            color: piece.color,
            position: piece.position,
        }
    }
}

impl PieceSnapshot {
    /// Absolute coordinates of the filled sub-cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(ly, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &v)| v != 0)
                .map(move |(lx, _)| (self.position.x + lx as i32, self.position.y + ly as i32))
        })
    }
}

/// Points of the last line clear, shown over the lowest cleared row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScore {
    pub row: usize,
    pub points: u64,
}

/// Plain-data copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major, `width * height` cells.
    pub board: Vec<Cell>,
    pub active: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
    pub score: u64,
    pub lines: u32,
    pub elapsed_ms: u64,
    pub paused: bool,
    pub game_over: bool,
    pub started: bool,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub episode_id: u32,
    /// Bonus banner text ("x12") while it is showing.
    pub banner: Option<String>,
    #[serde(default)]
    pub line_score: Option<LineScore>,
}

impl GameSnapshot {
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.board.get(y as usize * self.width as usize + x as usize)
    }

    pub fn playable(&self) -> bool {
        self.started && !self.game_over && !self.paused
    }

    pub fn elapsed_text(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            active: None,
            next: None,
            score: 0,
            lines: 0,
            elapsed_ms: 0,
            paused: false,
            game_over: false,
            started: false,
            difficulty: Difficulty::default(),
            seed: 0,
            episode_id: 0,
            banner: None,
            line_score: None,
        }
    }
}
