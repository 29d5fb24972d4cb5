//! Braille dot raster for line charts.
//!
//! Each terminal cell is a 2×4 dot matrix (U+2800 block), so a `w×h` cell
//! region offers a `2w×4h` pixel grid. A chart rasterizes every series into
//! its own `BrailleGrid`, then composites grids bottom-up with **opaque
//! replacement**: a cell touched by a higher series takes that series' glyph
//! and color wholesale. Merging dot masks across series would blend colors
//! and let a lower series bleed through the topmost line.

use crate::style::{Color, Style};
use crate::{Rect, Surface};

/// Dot bit for pixel (x∈0..2, y∈0..4) inside one cell, per the Unicode
/// braille layout.
const DOT_BITS: [[u8; 2]; 4] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

const BRAILLE_BASE: u32 = 0x2800;

#[derive(Debug, Clone)]
pub struct BrailleGrid {
    cell_w: u16,
    cell_h: u16,
    masks: Vec<u8>,
}

impl BrailleGrid {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            masks: vec![0; cell_w as usize * cell_h as usize],
        }
    }

    /// Pixel-space width (2 dots per cell column).
    pub fn width_px(&self) -> u32 {
        self.cell_w as u32 * 2
    }

    /// Pixel-space height (4 dots per cell row).
    pub fn height_px(&self) -> u32 {
        self.cell_h as u32 * 4
    }

    pub fn clear(&mut self) {
        self.masks.fill(0);
    }

    /// Set the dot at pixel (`px`, `py`); out-of-range pixels are clipped.
    pub fn set(&mut self, px: u32, py: u32) {
        if px >= self.width_px() || py >= self.height_px() {
            return;
        }
        let cell_x = (px / 2) as usize;
        let cell_y = (py / 4) as usize;
        let bit = DOT_BITS[(py % 4) as usize][(px % 2) as usize];
        self.masks[cell_y * self.cell_w as usize + cell_x] |= bit;
    }

    /// Rasterize a segment between two pixels (Bresenham).
    pub fn line(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        let (mut x, mut y) = (x0 as i64, y0 as i64);
        let (x1, y1) = (x1 as i64, y1 as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if x >= 0 && y >= 0 {
                self.set(x as u32, y as u32);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Composite this grid onto `surface` inside `region` with the given
    /// color. Every non-empty cell is replaced outright, glyph and style,
    /// which is what keeps the topmost series visually intact.
    pub fn composite(&self, surface: &mut Surface, region: Rect, color: Color) {
        let style = Style::fg(color);
        for cy in 0..self.cell_h.min(region.h) {
            for cx in 0..self.cell_w.min(region.w) {
                let mask = self.masks[cy as usize * self.cell_w as usize + cx as usize];
                if mask == 0 {
                    continue;
                }
                let glyph = char::from_u32(BRAILLE_BASE + mask as u32).unwrap_or(' ');
                surface.set(region.x + cx, region.y + cy, glyph, style);
            }
        }
    }

    #[cfg(test)]
    fn mask_at(&self, cell_x: u16, cell_y: u16) -> u8 {
        self.masks[cell_y as usize * self.cell_w as usize + cell_x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dot_sets_expected_bit() {
        let mut g = BrailleGrid::new(2, 1);
        g.set(0, 0);
        assert_eq!(g.mask_at(0, 0), 0x01);
        g.set(1, 3);
        assert_eq!(g.mask_at(0, 0), 0x01 | 0x80);
        g.set(2, 0);
        assert_eq!(g.mask_at(1, 0), 0x01);
    }

    #[test]
    fn out_of_range_pixels_are_clipped() {
        let mut g = BrailleGrid::new(1, 1);
        g.set(2, 0);
        g.set(0, 4);
        assert_eq!(g.mask_at(0, 0), 0);
    }

    #[test]
    fn horizontal_line_touches_every_column() {
        let mut g = BrailleGrid::new(4, 1);
        g.line(0, 0, 7, 0);
        for cx in 0..4 {
            assert_ne!(g.mask_at(cx, 0), 0, "cell {cx} must hold dots");
        }
    }

    #[test]
    fn composite_replaces_cells_opaquely() {
        let mut surface = Surface::new(2, 1);
        let mut below = BrailleGrid::new(2, 1);
        below.set(0, 0);
        below.set(2, 0);
        let mut above = BrailleGrid::new(2, 1);
        above.set(1, 0);

        let area = surface.area();
        below.composite(&mut surface, area, Color::Ansi(1));
        above.composite(&mut surface, area, Color::Ansi(2));

        // Cell 0 was touched by both; the higher series owns it entirely.
        let cell = surface.get(0, 0).unwrap();
        assert_eq!(cell.style.fg, Color::Ansi(2));
        assert_eq!(cell.symbol, char::from_u32(0x2800 + 0x08).unwrap());
        // Cell 1 only held the lower series and keeps its color.
        assert_eq!(surface.get(1, 0).unwrap().style.fg, Color::Ansi(1));
    }

    #[test]
    fn steep_line_is_contiguous() {
        let mut g = BrailleGrid::new(1, 2);
        g.line(0, 0, 1, 7);
        let dots: u32 = (0..2)
            .map(|cy| g.mask_at(0, cy).count_ones())
            .sum();
        assert!(dots >= 8, "steep Bresenham must not skip rows, got {dots}");
    }
}
