//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! Everything here is plain data (serde-derivable), usable from the core logic,
//! the terminal renderer, the input layer and the collaborator services alike.
//!
//! # Board Dimensions
//!
//! The default playfield is taller and wider than the classic 10x20 well:
//!
//! - **Width**: 16 columns (indexed 0-15)
//! - **Height**: 28 rows (indexed 0-27)
//! - **Spawn position**: horizontally centered for the drawn matrix, row 0
//!
//! Both dimensions are configurable per session; they never change while a
//! session is running.
//!
//! # Game Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host frame interval used by the terminal runner (~60 FPS) |
//! | `AUTO_DROP_MS` | 1000 | Auto-drop fires once the drop counter exceeds this |
//! | `BONUS_BANNER_MS` | 5000 | How long the "xN" bonus banner stays up |
//! | `LINE_SCORE_MS` | 1000 | How long the "+N" points stay over a cleared row |
//!
//! # Input Repeat Policy
//!
//! | Class | Initial delay | Repeat interval |
//! |-------|---------------|-----------------|
//! | standard (left/right/down) | 250ms | 50ms |
//! | special (rotate/hard drop) | 670ms | 670ms |
//!
//! # Examples
//!
//! ```
//! use bonus_tetris_types::{Difficulty, Direction, GameAction, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let tier = Difficulty::from_str("hard").unwrap();
//! assert_eq!(tier, Difficulty::Hard);
//!
//! assert_eq!(Direction::from_str("space"), Some(Direction::HardDrop));
//! assert_eq!(Direction::from_str("diagonal"), None);
//!
//! assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
//!
//! assert_eq!(BOARD_WIDTH, 16);
//! assert_eq!(BOARD_HEIGHT, 28);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (16 columns)
pub const BOARD_WIDTH: u16 = 16;

/// Default board height in cells (28 rows)
pub const BOARD_HEIGHT: u16 = 28;

/// Smallest board accepted by configuration validation.
pub const MIN_BOARD_SIDE: u16 = 4;

/// Largest board accepted by configuration validation.
pub const MAX_BOARD_SIDE: u16 = 64;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Auto-drop threshold: the drop counter must exceed this before a piece falls one row.
pub const AUTO_DROP_MS: u32 = 1000;

/// Duration of the on-screen bonus banner.
pub const BONUS_BANNER_MS: u32 = 5000;

/// Duration of the "+N" points popup after a line clear.
pub const LINE_SCORE_MS: u32 = 1000;

/// Percent chance (0..=100) that a freshly created cell may carry a bonus.
pub const BONUS_ELIGIBILITY_PERCENT: f64 = 94.0;

/// Standard actions: delay before auto-repeat starts.
pub const STANDARD_INITIAL_DELAY_MS: u32 = 250;

/// Standard actions: interval between auto-repeats.
pub const STANDARD_REPEAT_MS: u32 = 50;

/// Special actions (rotate, hard drop): delay before auto-repeat starts.
pub const SPECIAL_INITIAL_DELAY_MS: u32 = 670;

/// Special actions: interval between auto-repeats.
pub const SPECIAL_REPEAT_MS: u32 = 670;

/// Number of distinct line-clear sound cues (one, two, three, four, five+ lines).
pub const LINE_CLEAR_CUES: usize = 5;

/// Line clear scoring table, indexed by `min(lines, 5)`.
///
/// The base is scaled by the summed bonus multipliers of the cleared rows
/// (at least 1x).
pub const LINE_SCORES: [u64; 6] = [0, 100, 300, 500, 800, 1200];

/// Difficulty tier of the piece catalog.
///
/// Each tier is a superset of the easier tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a tier from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color attached to a piece and copied into board cells on lock.
///
/// Besides plain colors the palette carries two themed tokens that renderers
/// are free to draw however they like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorToken {
    Solid(Rgb),
    Ghost,
    Festive,
}

/// Board position (top-left anchor of a piece matrix, in board coordinates).
///
/// `y` may be negative while a piece is still partially above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A cell on the game board
///
/// `value == 0` means empty; any other value is the shape id of the piece
/// that was locked there. `bonus` is the multiplier revealed when the row is
/// cleared (0 = none). `bonus_eligible` is decided once, when the cell is
/// created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: u8,
    pub color: Option<ColorToken>,
    pub bonus: u8,
    pub bonus_eligible: bool,
}

impl Cell {
    pub const fn empty(bonus_eligible: bool) -> Self {
        Self {
            value: 0,
            color: None,
            bonus: 0,
            bonus_eligible,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.value > 0
    }
}

/// Movement tokens accepted by the movement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
    Rotate,
    HardDrop,
}

impl Direction {
    /// Parse a direction token (case-insensitive). `"space"` is the hard drop.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "down" => Some(Direction::Down),
            "rotate" => Some(Direction::Rotate),
            "space" | "harddrop" => Some(Direction::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Rotate => "rotate",
            Direction::HardDrop => "space",
        }
    }
}

/// Game actions delivered by input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    HardDrop,
    Pause,
    Restart,
}

impl GameAction {
    /// Parse action from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "movedown" | "down" => Some(GameAction::MoveDown),
            "rotate" => Some(GameAction::Rotate),
            "harddrop" | "space" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }

    /// The movement this action performs, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            GameAction::MoveLeft => Some(Direction::Left),
            GameAction::MoveRight => Some(Direction::Right),
            GameAction::MoveDown => Some(Direction::Down),
            GameAction::Rotate => Some(Direction::Rotate),
            GameAction::HardDrop => Some(Direction::HardDrop),
            GameAction::Pause | GameAction::Restart => None,
        }
    }
}

impl From<Direction> for GameAction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => GameAction::MoveLeft,
            Direction::Right => GameAction::MoveRight,
            Direction::Down => GameAction::MoveDown,
            Direction::Rotate => GameAction::Rotate,
            Direction::HardDrop => GameAction::HardDrop,
        }
    }
}
