//! Terminal "game renderer" module.
//!
//! Renders a [`GameSnapshot`](crate::core::GameSnapshot) into a framebuffer of
//! styled glyphs, then flushes only the changed runs to the terminal. No
//! widget toolkit is involved; each board cell is two columns wide to keep
//! blocks roughly square.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use bonus_tetris_core as core;
pub use bonus_tetris_types as types;

pub use fb::{FrameBuffer, Glyph, GlyphStyle};
pub use game_view::{AnchorY, GameView, ScoreLine, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
