//! Bonus Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benches share a single import root:
//! `bonus_tetris::{core, input, services, term, types}`.

pub mod settings;

pub use bonus_tetris_core as core;
pub use bonus_tetris_input as input;
pub use bonus_tetris_services as services;
pub use bonus_tetris_term as term;
pub use bonus_tetris_types as types;
