//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O) and unit-tested.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{FrameBuffer, Glyph, GlyphStyle};
use crate::types::{Cell, ColorToken, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const GHOST_FG: Rgb = Rgb::new(150, 150, 165);
const FESTIVE_A: Rgb = Rgb::new(220, 40, 40);
const FESTIVE_B: Rgb = Rgb::new(40, 180, 70);
const BANNER_FG: Rgb = Rgb::new(255, 215, 0);
const LINE_SCORE_FG: Rgb = Rgb::new(255, 165, 0);

/// One leaderboard row shown under the game-over overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub name: String,
    pub score: u64,
    pub time: String,
}

/// Placement of the well inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let frame = self.frame(snap, viewport);

        fb.fill_rect(
            frame.x.saturating_add(1),
            frame.y.saturating_add(1),
            snap.width.saturating_mul(self.cell_w),
            snap.height,
            ' ',
            GlyphStyle::new(WELL_BG, WELL_BG),
        );
        draw_border(fb, frame, GlyphStyle::new(Rgb::new(200, 200, 200), PANEL_BG));

        for y in 0..snap.height as i32 {
            for x in 0..snap.width as i32 {
                match snap.cell(x, y) {
                    Some(cell) if cell.is_filled() => self.draw_locked(fb, frame, x, y, cell),
                    _ => self.draw_empty(fb, frame, x, y),
                }
            }
        }

        if let Some(active) = &snap.active {
            for (x, y) in active.cells() {
                if x >= 0 && y >= 0 && x < snap.width as i32 && y < snap.height as i32 {
                    self.draw_block(fb, frame, x, y, active.color, None);
                }
            }
        }

        if let Some(popup) = snap.line_score.filter(|p| p.row < snap.height as usize) {
            let (px, py) = self.cell_origin(frame, 0, popup.row as i32);
            let style = GlyphStyle::new(LINE_SCORE_FG, WELL_BG).bold();
            fb.put_str(px, py, &format!("+{}", popup.points), style);
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            draw_overlay(fb, frame, "GAME OVER");
        } else if snap.paused {
            draw_overlay(fb, frame, "PAUSED");
        }
    }

    /// List `scores` under the game-over overlay. Call after [`render_into`](Self::render_into).
    pub fn draw_high_scores(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        scores: &[ScoreLine],
    ) {
        if !snap.game_over || scores.is_empty() {
            return;
        }
        let frame = self.frame(snap, viewport);
        let inner = frame.w.saturating_sub(2) as usize;
        let x = frame.x.saturating_add(1);
        let mut y = frame.y.saturating_add(frame.h / 2).saturating_add(2);
        let bottom = frame.y.saturating_add(frame.h).saturating_sub(1);

        let title = GlyphStyle::new(BANNER_FG, PANEL_BG).bold();
        let row = GlyphStyle::new(Rgb::new(220, 220, 220), PANEL_BG);
        fb.put_str(x, y, &format!("{:^inner$}", "TOP SCORES"), title);
        for (i, line) in scores.iter().enumerate() {
            y = y.saturating_add(1);
            if y >= bottom {
                break;
            }
            let name: String = line.name.chars().take(8).collect();
            let text = format!("{:>2}. {:<8} {:>7} {}", i + 1, name, line.score, line.time);
            let visible: String = text.chars().take(inner).collect();
            fb.put_str(x, y, &visible, row);
        }
    }

    fn frame(&self, snap: &GameSnapshot, viewport: Viewport) -> Frame {
        let w = snap.width.saturating_mul(self.cell_w).saturating_add(2);
        let h = snap.height.saturating_add(2);
        Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn cell_origin(&self, frame: Frame, x: i32, y: i32) -> (u16, u16) {
        let col = (x as u16).saturating_mul(self.cell_w);
        (
            frame.x.saturating_add(1).saturating_add(col),
            frame.y.saturating_add(1).saturating_add(y as u16),
        )
    }

    fn draw_empty(&self, fb: &mut FrameBuffer, frame: Frame, x: i32, y: i32) {
        let (px, py) = self.cell_origin(frame, x, y);
        let style = GlyphStyle::new(Rgb::new(90, 90, 100), WELL_BG).dim();
        fb.put_char(px, py, '·', style);
    }

    fn draw_locked(&self, fb: &mut FrameBuffer, frame: Frame, x: i32, y: i32, cell: &Cell) {
        let color = cell.color.unwrap_or(ColorToken::Solid(Rgb::new(128, 128, 128)));
        let bonus = (cell.bonus > 0).then_some(cell.bonus);
        self.draw_block(fb, frame, x, y, color, bonus);
    }

    /// Filled block; a bonus multiplier is printed over it.
    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        x: i32,
        y: i32,
        color: ColorToken,
        bonus: Option<u8>,
    ) {
        let (px, py) = self.cell_origin(frame, x, y);
        let (fg, ch) = match color {
            ColorToken::Solid(rgb) => (rgb, '█'),
            ColorToken::Ghost => (GHOST_FG, '▓'),
            ColorToken::Festive if (x + y) % 2 == 0 => (FESTIVE_A, '█'),
            ColorToken::Festive => (FESTIVE_B, '█'),
        };
        fb.fill_rect(px, py, self.cell_w, 1, ch, GlyphStyle::new(fg, WELL_BG));

        if let Some(multiplier) = bonus {
            let label = if multiplier >= 10 {
                multiplier.to_string()
            } else {
                format!("x{multiplier}")
            };
            let style = GlyphStyle::new(Rgb::new(0, 0, 0), fg).bold();
            let visible: String = label.chars().take(self.cell_w as usize).collect();
            fb.put_str(px, py, &visible, style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = GlyphStyle::default().bold();
        let value = GlyphStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (title, text) in [
            ("SCORE", snap.score.to_string()),
            ("LINES", snap.lines.to_string()),
            ("TIME", snap.elapsed_text()),
            ("LEVEL", snap.difficulty.as_str().to_string()),
        ] {
            fb.put_str(panel_x, y, title, label);
            fb.put_str(panel_x, y.saturating_add(1), &text, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = &snap.next {
            y = self.draw_preview(fb, panel_x, y, next);
        }

        if let Some(text) = &snap.banner {
            y = y.saturating_add(1);
            fb.put_str(panel_x, y, "BONUS", label);
            fb.put_str(
                panel_x,
                y.saturating_add(1),
                text,
                GlyphStyle::new(BANNER_FG, PANEL_BG).bold(),
            );
        }
    }

    /// Draw a piece's matrix at panel coordinates; returns the next free row.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: &PieceSnapshot) -> u16 {
        let fg = match piece.color {
            ColorToken::Solid(rgb) => rgb,
            ColorToken::Ghost => GHOST_FG,
            ColorToken::Festive => FESTIVE_A,
        };
        let style = GlyphStyle::new(fg, PANEL_BG);
        let mut row_y = y;
        for row in &piece.rows {
            if row.iter().all(|&v| v == 0) {
                continue;
            }
            for (i, &v) in row.iter().enumerate() {
                if v != 0 {
                    let px = x.saturating_add((i as u16).saturating_mul(self.cell_w));
                    fb.fill_rect(px, row_y, self.cell_w, 1, '█', style);
                }
            }
            row_y = row_y.saturating_add(1);
        }
        row_y
    }
}

fn draw_border(fb: &mut FrameBuffer, f: Frame, style: GlyphStyle) {
    if f.w < 2 || f.h < 2 {
        return;
    }
    let (right, bottom) = (f.x + f.w - 1, f.y + f.h - 1);
    fb.put_char(f.x, f.y, '┌', style);
    fb.put_char(right, f.y, '┐', style);
    fb.put_char(f.x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for x in f.x + 1..right {
        fb.put_char(x, f.y, '─', style);
        fb.put_char(x, bottom, '─', style);
    }
    for y in f.y + 1..bottom {
        fb.put_char(f.x, y, '│', style);
        fb.put_char(right, y, '│', style);
    }
}

fn draw_overlay(fb: &mut FrameBuffer, f: Frame, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = f.x.saturating_add(f.w.saturating_sub(text_w) / 2);
    let y = f.y.saturating_add(f.h / 2);
    fb.put_str(x, y, text, GlyphStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold());
}
