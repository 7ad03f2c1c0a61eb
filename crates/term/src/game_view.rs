//! GameView: draws a [`GameSnapshot`] into a framebuffer.
//!
//! Pure (no I/O), so layouts can be unit-tested.

use crate::core::{GameSnapshot, PieceSnapshot};
use crate::fb::{FrameBuffer, Glyph, Style};
use crate::types::{Block, Rgb};

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

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

/// Layout of the well and its side panels
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Terminal columns per board cell; 2 keeps cells roughly square
    cell_w: u16,
    show_ghost: bool,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            cell_w: 2,
            show_ghost: true,
        }
    }
}

/// Top-left corner of the well's inner area
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            ..Self::default()
        }
    }

    pub fn with_ghost(mut self, show_ghost: bool) -> Self {
        self.show_ghost = show_ghost;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let well_w = snap.width as u16 * self.cell_w;
        let well_h = snap.height as u16;
        let frame_w = well_w + 2;
        let frame_h = well_h + 2;
        let left = viewport.width.saturating_sub(frame_w) / 2;
        let top = viewport.height.saturating_sub(frame_h) / 2;
        let origin = Origin {
            x: left + 1,
            y: top + 1,
        };

        self.draw_frame(fb, left, top, frame_w, frame_h);

        for y in 0..snap.height {
            for x in 0..snap.width {
                match snap.cell(x, y) {
                    Some(block) => self.draw_block(fb, origin, x as i8, y as i8, block),
                    None => self.draw_cell(
                        fb,
                        origin,
                        x as i8,
                        y as i8,
                        Style::new(Rgb::new(90, 90, 100), WELL_BG).dim().glyph('·'),
                    ),
                }
            }
        }

        if let Some(active) = &snap.active {
            if self.show_ghost {
                let ghost = Style::new(active.block.color, WELL_BG).dim().glyph('░');
                for (x, y) in snap.ghost_cells() {
                    self.draw_cell(fb, origin, x, y, ghost);
                }
            }
            for &(x, y) in &active.cells {
                self.draw_block(fb, origin, x, y, active.block);
            }
        }

        let panel_x = left + frame_w + 2;
        self.draw_stats(fb, snap, panel_x, top);
        self.draw_queue(fb, snap, panel_x, top + 10);

        if let Some(hold) = &snap.hold {
            let hold_x = left.saturating_sub(12);
            if hold_x + 10 < left {
                fb.put_str(hold_x, top, "HOLD", label_style());
                let style = if snap.can_hold {
                    Style::new(hold.block.color, SCREEN_BG)
                } else {
                    Style::new(hold.block.color, SCREEN_BG).dim()
                };
                self.draw_mini(fb, hold, hold_x, top + 1, style);
            }
        }

        let banner = if snap.game_over {
            Some(if snap.new_best { "NEW BEST!" } else { "GAME OVER" })
        } else if snap.paused {
            Some("PAUSED")
        } else {
            None
        };
        if let Some(text) = banner {
            let x = left + frame_w.saturating_sub(text.len() as u16) / 2;
            fb.put_str(x, top + frame_h / 2, text, Style::new(Rgb::new(255, 255, 255), SCREEN_BG).bold());
        }

        let help = "←→ move  ↓ soft  space drop  x/z/a rotate  c hold  p pause  r restart  q quit";
        if top + frame_h < viewport.height {
            let x = viewport.width.saturating_sub(help.chars().count() as u16) / 2;
            fb.put_str(x, top + frame_h, help, value_style().dim());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_frame(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = Style::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let right = x + w - 1;
        let bottom = y + h - 1;
        for cx in x + 1..right {
            fb.set(cx, y, style.glyph('─'));
            fb.set(cx, bottom, style.glyph('─'));
        }
        for cy in y + 1..bottom {
            fb.set(x, cy, style.glyph('│'));
            fb.set(right, cy, style.glyph('│'));
        }
        fb.set(x, y, style.glyph('┌'));
        fb.set(right, y, style.glyph('┐'));
        fb.set(x, bottom, style.glyph('└'));
        fb.set(right, bottom, style.glyph('┘'));
    }

    /// Paint one board cell; cells above or beside the well are skipped.
    fn draw_cell(&self, fb: &mut FrameBuffer, origin: Origin, x: i8, y: i8, glyph: Glyph) {
        if x < 0 || y < 0 {
            return;
        }
        let px = origin.x + x as u16 * self.cell_w;
        fb.fill(px, origin.y + y as u16, self.cell_w, 1, glyph);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, origin: Origin, x: i8, y: i8, block: Block) {
        self.draw_cell(fb, origin, x, y, Style::new(block.color, WELL_BG).bold().glyph('█'));
    }

    fn draw_stats(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        let rows = [
            ("SCORE", snap.score),
            ("BEST", snap.best.max(snap.score)),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ];
        for (i, (label, value)) in rows.into_iter().enumerate() {
            let row = y + i as u16 * 2;
            fb.put_str(x, row, label, label_style());
            fb.put_number(x, row + 1, value, value_style());
        }
    }

    fn draw_queue(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        if snap.next.is_empty() {
            return;
        }
        fb.put_str(x, y, "NEXT", label_style());
        let mut row = y + 1;
        for piece in &snap.next {
            if row >= fb.height() {
                break;
            }
            self.draw_mini(fb, piece, x, row, Style::new(piece.block.color, SCREEN_BG));
            row += piece.shape.height() as u16 + 1;
        }
    }

    /// Draw a piece's occupied rows only, top-aligned at (x, y).
    fn draw_mini(&self, fb: &mut FrameBuffer, piece: &PieceSnapshot, x: u16, y: u16, style: Style) {
        let top = piece.shape.cells().map(|(_, dy)| dy).min().unwrap_or(0);
        for (dx, dy) in piece.shape.cells() {
            let px = x + dx as u16 * self.cell_w;
            fb.fill(px, y + (dy - top) as u16, self.cell_w, 1, style.glyph('█'));
        }
    }
}

fn label_style() -> Style {
    Style::new(Rgb::new(220, 220, 220), SCREEN_BG).bold()
}

fn value_style() -> Style {
    Style::new(Rgb::new(200, 200, 200), SCREEN_BG)
}
