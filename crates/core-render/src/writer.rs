//! Terminal writer: flush a composed `Surface` as one queued batch.
//!
//! Commands are queued and flushed once per frame; no mid-frame flushing.
//! Within a row, runs of identically-styled cells collapse into a single
//! `Print`, which keeps the escape-sequence volume proportional to style
//! changes rather than cells.

use crate::style::Style;
use crate::Surface;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::Write;

pub struct Writer<W: Write> {
    out: W,
}

impl<W: Write> Writer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit the full surface. The caller owns cursor visibility and screen
    /// mode; this writes cells only.
    pub fn flush_surface(&mut self, surface: &Surface) -> Result<()> {
        let mut current: Option<Style> = None;
        for y in 0..surface.height() {
            queue!(self.out, MoveTo(0, y))?;
            let mut run = String::with_capacity(surface.width() as usize);
            for cell in surface.row(y) {
                if current != Some(cell.style) {
                    if !run.is_empty() {
                        queue!(self.out, Print(std::mem::take(&mut run)))?;
                    }
                    Self::apply_style(&mut self.out, cell.style)?;
                    current = Some(cell.style);
                }
                run.push(cell.symbol);
            }
            if !run.is_empty() {
                queue!(self.out, Print(run))?;
            }
        }
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        self.out.flush()?;
        Ok(())
    }

    fn apply_style(out: &mut W, style: Style) -> Result<()> {
        queue!(out, SetAttribute(Attribute::Reset))?;
        queue!(out, SetForegroundColor(style.fg.to_crossterm()))?;
        if style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn styled_runs_coalesce() {
        let mut surface = Surface::new(6, 1);
        let red = Style::fg(Color::Ansi(1));
        for x in 0..3 {
            surface.set(x, 0, 'a', red);
        }
        let mut buf = Vec::new();
        Writer::new(&mut buf).flush_surface(&surface).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // Three same-styled cells print contiguously.
        assert!(text.contains("aaa"));
    }

    #[test]
    fn every_row_gets_a_move() {
        let surface = Surface::new(2, 3);
        let mut buf = Vec::new();
        Writer::new(&mut buf).flush_surface(&surface).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // One absolute cursor move per row (CSI row;colH).
        assert_eq!(text.matches(";1H").count(), 3);
    }
}
