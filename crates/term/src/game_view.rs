//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell as GridCell, GRID_HEIGHT, GRID_WIDTH};

const WIDTH: u16 = GRID_WIDTH as u16;
const HEIGHT: u16 = GRID_HEIGHT as u16;

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);

/// Colors for cell values 1..=7
const PALETTE: [Rgb; 7] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(128, 0, 128),
];

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

pub struct GameView {
    /// Terminal columns per grid cell
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell roughly squares the glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Width and height of the bordered playfield in terminal cells
    pub fn frame_size(&self) -> (u16, u16) {
        (WIDTH * self.cell_w + 2, HEIGHT + 2)
    }

    /// Render into a reusable framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear();

        let (frame_w, frame_h) = self.frame_size();
        let origin_x = viewport.width.saturating_sub(frame_w) / 2;
        let origin_y = viewport.height.saturating_sub(frame_h) / 2;

        draw_border(fb, origin_x, origin_y, frame_w, frame_h);

        let frame = snap.composited();
        for (y, row) in frame.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                self.draw_cell(fb, origin_x, origin_y, x as u16, y as u16, value);
            }
        }

        let hud_x = origin_x.saturating_add(frame_w).saturating_add(2);
        let label = CellStyle::default().bold();
        let value = CellStyle::default();
        let mut y = origin_y.saturating_add(1);
        for (name, v) in [
            ("Score", snap.score),
            ("Level", snap.level),
            ("Lines", snap.lines),
        ] {
            fb.put_str(hud_x, y, name, label);
            fb.put_str(hud_x, y.saturating_add(1), &v.to_string(), value);
            y = y.saturating_add(3);
        }

        if snap.game_over {
            let text = "GAME OVER";
            let text_w = text.chars().count() as u16;
            let x = origin_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
            let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
            fb.put_str(x, origin_y.saturating_add(frame_h / 2), text, style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, ox: u16, oy: u16, x: u16, y: u16, value: GridCell) {
        let (ch, style) = match color_of(value) {
            Some(fg) => ('█', CellStyle::new(fg, PLAYFIELD_BG)),
            None => ('·', CellStyle::new(Rgb::new(100, 100, 100), PLAYFIELD_BG)),
        };
        let px = ox + 1 + x * self.cell_w;
        fb.fill_rect(px, oy + 1 + y, self.cell_w, 1, ch, style);
    }
}

fn color_of(value: GridCell) -> Option<Rgb> {
    PALETTE.get(usize::from(value).checked_sub(1)?).copied()
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    let style = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
    let right = x + w - 1;
    let bottom = y + h - 1;

    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, bottom, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(right, y + dy, '│', style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActivePiece, ShapeKind};

    fn find_text(fb: &FrameBuffer, needle: &str) -> bool {
        (0..fb.height()).any(|y| fb.row_text(y).contains(needle))
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(color_of(0), None);
        assert_eq!(color_of(1), Some(Rgb::new(255, 0, 0)));
        assert_eq!(color_of(7), Some(Rgb::new(128, 0, 128)));
        assert_eq!(color_of(8), None);
    }

    #[test]
    fn test_renders_border_and_hud() {
        let snap = GameSnapshot {
            score: 1234,
            level: 3,
            lines: 7,
            ..GameSnapshot::default()
        };
        let view = GameView::default();
        let fb = view.render(&snap, Viewport::new(60, 24));

        // Frame is 22x22, centered horizontally at column 19.
        assert_eq!(fb.get(19, 1).map(|c| c.ch), Some('┌'));
        assert_eq!(fb.get(40, 22).map(|c| c.ch), Some('┘'));
        assert!(find_text(&fb, "Score"));
        assert!(find_text(&fb, "1234"));
        assert!(find_text(&fb, "Level"));
        assert!(find_text(&fb, "Lines"));
        assert!(!find_text(&fb, "GAME OVER"));
    }

    #[test]
    fn test_renders_locked_and_active_cells() {
        let mut snap = GameSnapshot::default();
        snap.grid[19][0] = 4;
        snap.active = Some(ActivePiece::spawn(ShapeKind::O).into());

        let view = GameView::default();
        let fb = view.render(&snap, Viewport::new(22, 22));

        // Grid cell (0, 19) -> terminal (1..=2, 20)
        let locked = fb.get(1, 20).unwrap();
        assert_eq!(locked.ch, '█');
        assert_eq!(locked.style.fg, Rgb::new(255, 255, 0));
        assert_eq!(fb.get(2, 20).unwrap().ch, '█');

        // O at (3, 0) -> terminal x 7..=10, y 1..=2, color 2
        let active = fb.get(7, 1).unwrap();
        assert_eq!(active.ch, '█');
        assert_eq!(active.style.fg, Rgb::new(0, 255, 0));
        assert_eq!(fb.get(10, 2).unwrap().ch, '█');

        assert_eq!(fb.get(11, 1).unwrap().ch, '·');
    }

    #[test]
    fn test_game_over_overlay() {
        let snap = GameSnapshot {
            game_over: true,
            ..GameSnapshot::default()
        };
        let fb = GameView::default().render(&snap, Viewport::new(40, 24));
        assert!(find_text(&fb, "GAME OVER"));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let fb = GameView::new(1).render(&GameSnapshot::default(), Viewport::new(3, 2));
        assert_eq!((fb.width(), fb.height()), (3, 2));
    }
}
