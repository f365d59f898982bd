//! Collision detection between a piece and the board.
//!
//! A filled sub-cell collides when it lands left or right of the board, below
//! the bottom row, or on a filled board cell. Sub-cells above the top edge
//! (negative `y`) never collide, so pieces may spawn partially hidden.

use crate::board::Board;
use crate::pieces::{Matrix, Piece};
use crate::types::Position;

/// True if `piece` overlaps a filled cell or leaves the board sideways/bottom.
pub fn check_collision(board: &Board, piece: &Piece) -> bool {
    check_collision_at(board, &piece.matrix, piece.position)
}

/// Probe a candidate matrix/position without building a piece.
pub fn check_collision_at(board: &Board, matrix: &Matrix, position: Position) -> bool {
    let width = board.width() as i32;
    let height = board.height() as i32;

    matrix.filled().any(|(lx, ly, _)| {
        let x = position.x + lx;
        let y = position.y + ly;
        if x < 0 || x >= width || y >= height {
            return true;
        }
        y >= 0 && board.is_occupied(x, y)
    })
}
