//! Input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides a
//! repeat handler that works on actions, not keys, so keyboard and touch
//! sources share one timing policy. The handler also copes with terminals that
//! never report key releases.

pub mod handler;
pub mod map;

pub use bonus_tetris_types as types;

pub use handler::{ActionClass, InputHandler, RepeatConfig, RepeatPolicy};
pub use map::{handle_key_event, should_quit};
