//! Rendering tests: game state through GameView into the diff renderer

use bonus_tetris::core::GameState;
use bonus_tetris::term::{
    encode_diff_into, AnchorY, FrameBuffer, GameView, TerminalRenderer, Viewport,
};
use bonus_tetris::types::{Cell, GameAction};

fn contains(fb: &FrameBuffer, needle: &str) -> bool {
    (0..fb.height()).any(|y| fb.row_text(y).contains(needle))
}

fn bonus_clear(game: &mut GameState, multiplier: u8) {
    for x in 0..game.board().width() as i32 {
        game.board_mut().set(x, 27, Cell { value: 1, ..Cell::empty(false) });
    }
    if let Some(cell) = game.board_mut().get_mut(4, 27) {
        cell.bonus = multiplier;
    }
    game.apply_action(GameAction::HardDrop, 0);
}

#[test]
fn test_banner_appears_after_bonus_clear() {
    let mut game = GameState::new(12345);
    let ticket = game.start(0);
    bonus_clear(&mut game, 10);

    let view = GameView::default();
    let fb = view.render(&game.snapshot(), Viewport::new(80, 32));
    assert!(contains(&fb, "BONUS"));
    assert!(contains(&fb, "x10"));
    assert!(contains(&fb, "+1000"));

    game.tick(ticket, 5_001);
    let fb = view.render(&game.snapshot(), Viewport::new(80, 32));
    assert!(!contains(&fb, "BONUS"));
    assert!(!contains(&fb, "+1000"));
}

#[test]
fn test_locked_cells_are_drawn() {
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let mut game = GameState::new(12345);
    game.start(0);
    let before = view.render(&game.snapshot(), Viewport::new(80, 32));

    game.apply_action(GameAction::HardDrop, 0);
    let after = view.render(&game.snapshot(), Viewport::new(80, 32));

    // Bottom well row sits at y = 28 (border at 0).
    assert_ne!(before.row_text(28), after.row_text(28));
    assert!(before.row_text(28).contains('·'));
}

#[test]
fn test_game_over_overlay() {
    let mut game = GameState::new(4);
    game.start(0);
    for _ in 0..200 {
        if game.is_game_over() {
            break;
        }
        game.apply_action(GameAction::HardDrop, 0);
    }
    assert!(game.is_game_over());

    let fb = GameView::default().render(&game.snapshot(), Viewport::new(80, 32));
    assert!(contains(&fb, "GAME OVER"));
}

#[test]
fn test_unchanged_frame_encodes_nothing() {
    let mut game = GameState::new(1);
    game.start(0);
    let view = GameView::default();
    let a = view.render(&game.snapshot(), Viewport::new(60, 30));
    let b = view.render(&game.snapshot(), Viewport::new(60, 30));

    let mut out = Vec::new();
    encode_diff_into(&a, &b, &mut out).unwrap();
    assert!(out.len() < 16, "diff of identical frames wrote {} bytes", out.len());
}

#[test]
fn test_renderer_writes_to_any_writer() {
    let mut game = GameState::new(1);
    game.start(0);
    let view = GameView::default();
    let mut renderer = TerminalRenderer::with_writer(Vec::new());

    let mut fb = view.render(&game.snapshot(), Viewport::new(60, 30));
    renderer.draw_swap(&mut fb).unwrap();
    let full = renderer.writer().len();
    assert!(full > 0);

    game.apply_action(GameAction::MoveLeft, 0);
    view.render_into(&game.snapshot(), Viewport::new(60, 30), &mut fb);
    renderer.draw_swap(&mut fb).unwrap();
    let diff = renderer.writer().len() - full;
    assert!(diff > 0 && diff < full);
}
