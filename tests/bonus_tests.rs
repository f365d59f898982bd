//! Bonus multiplier tests across the lock / clear / score path

use bonus_tetris::core::bonus::multiplier_for;
use bonus_tetris::core::{
    lock_piece, process_completed_lines, Board, BonusAssigner, GameState, Matrix, Piece,
    BONUS_VALUES, PALETTE,
};
use bonus_tetris::types::{Cell, Direction, Position, LINE_SCORES};

fn filled(value: u8) -> Cell {
    Cell {
        value,
        ..Cell::empty(true)
    }
}

#[test]
fn test_tier_table() {
    assert_eq!(multiplier_for(0.0), 2);
    assert_eq!(multiplier_for(3.49), 2);
    assert_eq!(multiplier_for(3.5), 3);
    assert_eq!(multiplier_for(6.9), 4);
    assert_eq!(multiplier_for(7.5), 5);
    assert_eq!(multiplier_for(8.1), 10);
    assert_eq!(multiplier_for(8.2), 0);
    assert_eq!(multiplier_for(99.9), 0);
}

#[test]
fn test_fully_eligible_rows_eventually_get_a_bonus() {
    let mut assigner = BonusAssigner::new(99, 100.0);
    let mut board = Board::with_marks(8, 40, || true);
    let bar = Matrix::from_rows(&[[1u8, 1, 1, 1]]);

    for y in 0..40 {
        let piece = Piece::new(bar.clone(), PALETTE[0], Position::new(2, y));
        lock_piece(&mut board, &piece, &mut assigner);
    }

    let with_bonus: Vec<usize> = (0..40)
        .filter(|&y| board.row(y).iter().any(|c| c.bonus > 0))
        .collect();
    let assigned: Vec<usize> = assigner.assigned_rows().collect();
    assert_eq!(with_bonus, assigned);
    for &y in &with_bonus {
        let bonus_cells: Vec<_> = board.row(y).iter().filter(|c| c.bonus > 0).collect();
        assert_eq!(bonus_cells.len(), 1);
        assert_eq!(board.row(y)[2].bonus, bonus_cells[0].bonus);
    }
}

#[test]
fn test_ineligible_cells_never_carry_bonus() {
    let mut assigner = BonusAssigner::new(5, 94.0);
    let mut board = Board::new(8, 8);
    let square = Matrix::from_rows(&[[1u8, 1], [1, 1]]);

    for i in 0..200 {
        let piece = Piece::new(square.clone(), PALETTE[1], Position::new(i % 7, i % 7));
        lock_piece(&mut board, &piece, &mut assigner);
    }

    assert!(board.cells().iter().all(|c| c.bonus == 0));
    assert_eq!(assigner.assigned_rows().count(), 0);
}

#[test]
fn test_clear_sums_every_bonus_cell_of_cleared_rows() {
    let mut board = Board::new(3, 4);
    for y in 1..4 {
        for x in 0..3 {
            board.set(x, y, filled(1));
        }
    }
    board.get_mut(0, 1).unwrap().bonus = 10;
    board.get_mut(2, 2).unwrap().bonus = 2;
    board.get_mut(1, 3).unwrap().bonus = 3;
    board.get_mut(2, 3).unwrap().bonus = 4;

    let mut assigner = BonusAssigner::new(1, 0.0);
    let report = process_completed_lines(&mut board, &mut assigner);

    assert_eq!(report.line_count, 3);
    assert_eq!(report.cleared_rows, vec![1, 2, 3]);
    assert_eq!(report.total_bonus_multiplier_sum, 19);
    assert_eq!(report.bonus_cell_count, 4);
    assert_eq!(board.filled_count(), 0);
}

#[test]
fn test_cleared_index_is_evicted_without_shifting_others() {
    let mut assigner = BonusAssigner::new(3, 100.0);
    for row in [1, 3] {
        while assigner.assign_bonus(row) == 0 {}
    }

    let mut board = Board::new(2, 4);
    board.set(0, 3, filled(1));
    board.set(1, 3, filled(1));

    process_completed_lines(&mut board, &mut assigner);

    assert!(!assigner.is_assigned(3));
    assert!(assigner.is_assigned(1));
    assert!(!assigner.is_assigned(2));
}

#[test]
fn test_score_delta_matches_bonus_sum_over_a_long_game() {
    let mut game = GameState::new(2024);
    game.start(0);

    let mut total_lines = 0;
    for i in 0..2_000 {
        if game.is_game_over() {
            break;
        }
        let before = game.score();
        // Wander so the stack spreads across the well.
        let direction = match i % 5 {
            0 | 1 => Direction::Left,
            2 => Direction::Rotate,
            _ => Direction::Right,
        };
        for _ in 0..(i % 9) {
            game.move_direction(direction);
        }
        game.move_direction(Direction::HardDrop);

        if let Some(report) = game.last_clear() {
            if report.line_count > 0 {
                total_lines += report.line_count as u32;
                let base = LINE_SCORES[report.line_count.min(5)];
                let factor = u64::from(report.total_bonus_multiplier_sum.max(1));
                assert_eq!(game.score() - before, base * factor);
            } else {
                assert_eq!(game.score(), before);
            }
        }
        assert!(game
            .board()
            .cells()
            .iter()
            .all(|c| BONUS_VALUES.contains(&c.bonus)));
    }
    assert_eq!(game.lines(), total_lines);
}
