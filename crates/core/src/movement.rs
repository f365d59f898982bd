//! Movement and rotation engine
//!
//! Every operation mutates the piece first, checks for a collision and reverts
//! when one is found. A blocked downward move is the only way a piece locks:
//! the engine then hands the piece to its [`MovementHooks`] which write it into
//! the board and clear completed rows. The hooks are supplied once at
//! construction.

use crate::board::Board;
use crate::collision::{check_collision, check_collision_at};
use crate::error::GameError;
use crate::pieces::Piece;
use crate::audio::SoundCue;
use crate::types::Direction;

/// Capabilities the engine needs from its owner.
pub trait MovementHooks {
    /// Feedback for an attempted move, a rotation or a lock.
    fn cue(&mut self, cue: SoundCue);
    /// Write the piece into the board.
    fn solidify(&mut self, board: &mut Board, piece: &Piece);
    /// Clear completed rows after a lock.
    fn remove_lines(&mut self, board: &mut Board);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The piece moved or rotated.
    Moved,
    /// The move collided and was reverted.
    Blocked,
    /// The piece was written into the board and lines were processed.
    Locked,
}

#[derive(Debug, Clone)]
pub struct MovementEngine<H> {
    hooks: H,
}

impl<H: MovementHooks> MovementEngine<H> {
    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    pub fn move_left(&mut self, board: &mut Board, piece: &mut Piece) -> MoveOutcome {
        self.shift(board, piece, -1)
    }

    pub fn move_right(&mut self, board: &mut Board, piece: &mut Piece) -> MoveOutcome {
        self.shift(board, piece, 1)
    }

    fn shift(&mut self, board: &Board, piece: &mut Piece, dx: i32) -> MoveOutcome {
        self.hooks.cue(SoundCue::Move);
        piece.position.x += dx;
        if check_collision(board, piece) {
            piece.position.x -= dx;
            return MoveOutcome::Blocked;
        }
        MoveOutcome::Moved
    }

    /// Move one row down; a collision locks the piece in its previous row.
    pub fn move_down(&mut self, board: &mut Board, piece: &mut Piece) -> MoveOutcome {
        self.hooks.cue(SoundCue::Move);
        piece.position.y += 1;
        if check_collision(board, piece) {
            piece.position.y -= 1;
            self.lock(board, piece);
            return MoveOutcome::Locked;
        }
        MoveOutcome::Moved
    }

    /// Rotate clockwise in place. There are no wall kicks.
    pub fn rotate(&mut self, board: &mut Board, piece: &mut Piece) -> MoveOutcome {
        self.hooks.cue(SoundCue::Rotate);
        let rotated = piece.matrix.rotated_cw();
        if check_collision_at(board, &rotated, piece.position) {
            return MoveOutcome::Blocked;
        }
        piece.matrix = rotated;
        MoveOutcome::Moved
    }

    /// Drop straight down and lock.
    pub fn hard_drop(&mut self, board: &mut Board, piece: &mut Piece) -> MoveOutcome {
        self.hooks.cue(SoundCue::SpeedDown);
        let max_steps = board.height() as usize + piece.matrix.rows();
        for _ in 0..max_steps {
            if check_collision_at(board, &piece.matrix, piece.position.offset(0, 1)) {
                break;
            }
            piece.position.y += 1;
        }
        self.lock(board, piece);
        MoveOutcome::Locked
    }

    pub fn apply(&mut self, board: &mut Board, piece: &mut Piece, direction: Direction) -> MoveOutcome {
        match direction {
            Direction::Left => self.move_left(board, piece),
            Direction::Right => self.move_right(board, piece),
            Direction::Down => self.move_down(board, piece),
            Direction::Rotate => self.rotate(board, piece),
            Direction::HardDrop => self.hard_drop(board, piece),
        }
    }

    /// Parse `token` and apply it.
    pub fn apply_token(
        &mut self,
        board: &mut Board,
        piece: &mut Piece,
        token: &str,
    ) -> Result<MoveOutcome, GameError> {
        let direction = parse_direction(token)?;
        Ok(self.apply(board, piece, direction))
    }

    fn lock(&mut self, board: &mut Board, piece: &Piece) {
        self.hooks.cue(SoundCue::Collision);
        self.hooks.solidify(board, piece);
        self.hooks.remove_lines(board);
    }
}

pub fn parse_direction(token: &str) -> Result<Direction, GameError> {
    Direction::from_str(token).ok_or_else(|| GameError::InvalidDirection(token.to_string()))
}
