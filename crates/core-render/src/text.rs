//! Text and border drawing helpers over `Surface`.

use crate::style::Style;
use crate::{Rect, Surface};
use unicode_width::UnicodeWidthChar;

/// Draw `text` starting at (`x`, `y`), clipped to `max_w` display columns.
/// Wide glyphs that would straddle the clip edge are dropped, and the column
/// they would have half-filled is left as-is. Returns the columns consumed.
pub fn draw_text(surface: &mut Surface, x: u16, y: u16, text: &str, style: Style, max_w: u16) -> u16 {
    let mut col = 0u16;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0) as u16;
        if w == 0 {
            continue;
        }
        if col + w > max_w {
            break;
        }
        surface.set(x + col, y, ch, style);
        // Occupy the continuation column of a wide glyph with a space so
        // stale content cannot show through.
        for extra in 1..w {
            surface.set(x + col + extra, y, ' ', style);
        }
        col += w;
    }
    col
}

/// Truncate to `max_w` columns, appending `…` when content was dropped.
pub fn clip_label(text: &str, max_w: u16) -> String {
    let total: u16 = text
        .chars()
        .map(|c| c.width().unwrap_or(0) as u16)
        .sum();
    if total <= max_w {
        return text.to_string();
    }
    if max_w == 0 {
        return String::new();
    }
    let budget = max_w - 1;
    let mut out = String::new();
    let mut col = 0u16;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0) as u16;
        if col + w > budget {
            break;
        }
        out.push(ch);
        col += w;
    }
    out.push('…');
    out
}

/// Single-line box-drawing border with an optional title in the top edge.
pub fn draw_border(surface: &mut Surface, region: Rect, style: Style, title: Option<&str>) {
    if region.w < 2 || region.h < 2 {
        return;
    }
    let right = region.x + region.w - 1;
    let bottom = region.y + region.h - 1;

    surface.set(region.x, region.y, '╭', style);
    surface.set(right, region.y, '╮', style);
    surface.set(region.x, bottom, '╰', style);
    surface.set(right, bottom, '╯', style);
    for x in region.x + 1..right {
        surface.set(x, region.y, '─', style);
        surface.set(x, bottom, '─', style);
    }
    for y in region.y + 1..bottom {
        surface.set(region.x, y, '│', style);
        surface.set(right, y, '│', style);
    }

    if let Some(title) = title {
        let budget = region.w.saturating_sub(4);
        if budget > 0 {
            let label = clip_label(title, budget);
            draw_text(surface, region.x + 2, region.y, &label, style, budget);
        }
    }
}

/// Horizontal rule across a row of `region`.
pub fn draw_hline(surface: &mut Surface, x: u16, y: u16, w: u16, style: Style) {
    for dx in 0..w {
        surface.set(x + dx, y, '─', style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn text_clips_at_budget() {
        let mut s = Surface::new(10, 1);
        let used = draw_text(&mut s, 0, 0, "abcdef", Style::default(), 3);
        assert_eq!(used, 3);
        assert_eq!(s.get(2, 0).unwrap().symbol, 'c');
        assert_eq!(s.get(3, 0).unwrap().symbol, ' ');
    }

    #[test]
    fn wide_glyph_never_straddles_clip_edge() {
        let mut s = Surface::new(10, 1);
        // '世' is two columns; only one column of budget remains after 'a'.
        let used = draw_text(&mut s, 0, 0, "a世", Style::default(), 2);
        assert_eq!(used, 1);
    }

    #[test]
    fn clip_label_appends_ellipsis() {
        assert_eq!(clip_label("metrics/accuracy", 8), "metrics…");
        assert_eq!(clip_label("loss", 8), "loss");
    }

    #[test]
    fn border_draws_title_and_corners() {
        let mut s = Surface::new(12, 4);
        let style = Style::fg(Color::Ansi(4));
        draw_border(&mut s, Rect::new(0, 0, 12, 4), style, Some("loss"));
        assert_eq!(s.get(0, 0).unwrap().symbol, '╭');
        assert_eq!(s.get(11, 3).unwrap().symbol, '╯');
        assert_eq!(s.get(2, 0).unwrap().symbol, 'l');
        assert_eq!(s.get(5, 0).unwrap().symbol, 's');
    }

    #[test]
    fn degenerate_border_region_is_ignored() {
        let mut s = Surface::new(4, 4);
        draw_border(&mut s, Rect::new(0, 0, 1, 1), Style::default(), None);
        assert_eq!(s.get(0, 0).unwrap().symbol, ' ');
    }
}
