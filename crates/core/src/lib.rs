//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the bonus variant: the board, the piece
//! catalog, collision, movement, the per-row bonus multipliers, line clears,
//! scoring and the tick-driven clock. It never touches the terminal, the file
//! system or the network; audio and scoring are injected through traits.
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with two-pointer row removal
//! - [`pieces`]: shape matrices, rotation and the difficulty-tiered catalog
//! - [`collision`]: piece/board overlap test
//! - [`rng`]: seeded ChaCha8 streams for piece and bonus draws
//! - [`bonus`]: per-row multiplier draws and the assigned-row set
//! - [`line_clear`]: completed-row scan, bonus summation and refill
//! - [`movement`]: translate/rotate/drop with revert-on-collision
//! - [`lock`]: what happens when a piece comes to rest
//! - [`clock`]: elapsed time, auto-drop counter and tick tickets
//! - [`game_state`]: the aggregate that ties everything together
//!
//! # Example
//!
//! ```
//! use bonus_tetris_core::{GameState, MoveOutcome};
//! use bonus_tetris_core::types::{Direction, GameAction};
//!
//! let mut game = GameState::new(12345);
//! let ticket = game.start(0);
//!
//! game.apply_action(GameAction::MoveRight, 0);
//! assert_eq!(game.move_direction(Direction::HardDrop), MoveOutcome::Locked);
//! assert!(game.board().filled_count() > 0);
//!
//! // The host calls tick with the current wall time and reschedules with the
//! // returned ticket.
//! let next = game.tick(ticket, 16);
//! assert_eq!(next, Some(ticket));
//! ```

pub mod audio;
pub mod banner;
pub mod board;
pub mod bonus;
pub mod clock;
pub mod collision;
pub mod config;
pub mod error;
pub mod game_state;
pub mod line_clear;
pub mod lock;
pub mod movement;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use bonus_tetris_types as types;

// Re-export commonly used types for convenience
pub use audio::{line_clear_cue, AudioEvent, AudioNotifier, Recorder, Silent, SoundCue};
pub use banner::{BonusBanner, LineScorePopup};
pub use board::Board;
pub use bonus::{BonusAssigner, BONUS_TIERS, BONUS_VALUES};
pub use clock::{format_elapsed, ClockState, GameClock, TickTicket};
pub use collision::{check_collision, check_collision_at};
pub use config::GameConfig;
pub use error::{ConfigError, GameError};
pub use game_state::GameState;
pub use line_clear::{process_completed_lines, LineClearReport};
pub use lock::{lock_piece, LockPipeline};
pub use movement::{MoveOutcome, MovementEngine, MovementHooks};
pub use pieces::{
    catalog, catalog_entry, catalog_len, spawn_footprint, CatalogEntry, Matrix, Piece, PALETTE,
};
pub use rng::{GameRng, PieceSource};
pub use scoring::{ScoringPolicy, StandardScoring};
pub use snapshot::{GameSnapshot, LineScore, PieceSnapshot};
