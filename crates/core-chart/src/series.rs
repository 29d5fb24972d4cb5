//! Sample storage for one chart line.
//!
//! Samples live in parallel `xs`/`ys` vectors that only ever grow by
//! amortized `extend`: incremental ingest must stay O(n) overall, so no
//! path may rebuild the arrays per batch. Bounds are maintained
//! incrementally on append and skip non-finite values; a full recompute
//! happens only when a series is removed from a chart.
//!
//! The style lives behind an `ArcSwap` so a color reassignment (palette
//! change, pin promotion) can land while a draw is reading it, without a
//! lock around the hot render path.

use arc_swap::ArcSwap;
use core_render::Color;
use std::sync::Arc;

/// Aggregate extent of a sample set. Empty bounds carry infinities so that
/// `union` and `extend` need no special cases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }
}

impl Bounds {
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Grow to include one sample; non-finite coordinates are excluded from
    /// bounds entirely.
    pub fn extend(&mut self, x: f64, y: f64) {
        if x.is_finite() {
            self.x_min = self.x_min.min(x);
            self.x_max = self.x_max.max(x);
        }
        if y.is_finite() {
            self.y_min = self.y_min.min(y);
            self.y_max = self.y_max.max(y);
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    pub color: Color,
}

#[derive(Debug)]
pub struct Series {
    xs: Vec<f64>,
    ys: Vec<f64>,
    bounds: Bounds,
    style: ArcSwap<SeriesStyle>,
}

impl Series {
    pub fn new(color: Color) -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
            bounds: Bounds::default(),
            style: ArcSwap::from_pointee(SeriesStyle { color }),
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn color(&self) -> Color {
        self.style.load().color
    }

    /// Style write that may race a concurrent draw; the draw sees either the
    /// old or the new color, never a torn value.
    pub fn set_color(&self, color: Color) {
        self.style.store(Arc::new(SeriesStyle { color }));
    }

    /// Append a batch. Mismatched array lengths are truncated to the shorter
    /// side so the parallel-array invariant holds no matter the producer.
    pub fn append(&mut self, xs: &[f64], ys: &[f64]) {
        let n = xs.len().min(ys.len());
        self.xs.extend_from_slice(&xs[..n]);
        self.ys.extend_from_slice(&ys[..n]);
        for i in 0..n {
            self.bounds.extend(xs[i], ys[i]);
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
        self.bounds.extend(x, y);
    }

    /// First index with `xs[i] >= x`. Tolerates duplicate x values.
    pub fn lower_bound(&self, x: f64) -> usize {
        self.xs.partition_point(|&v| v < x)
    }

    /// First index with `xs[i] > x`.
    pub fn upper_bound(&self, x: f64) -> usize {
        self.xs.partition_point(|&v| v <= x)
    }

    /// Index of the sample whose x is nearest to `x` (ties resolve to either
    /// neighbor). `None` when empty.
    pub fn nearest_index(&self, x: f64) -> Option<usize> {
        if self.xs.is_empty() {
            return None;
        }
        let at = self.lower_bound(x);
        if at == 0 {
            return Some(0);
        }
        if at >= self.xs.len() {
            return Some(self.xs.len() - 1);
        }
        let before = at - 1;
        if (x - self.xs[before]).abs() <= (self.xs[at] - x).abs() {
            Some(before)
        } else {
            Some(at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_skip_non_finite() {
        let mut s = Series::new(Color::Ansi(1));
        s.append(&[0.0, 1.0, 2.0], &[1.0, f64::NAN, f64::INFINITY]);
        let b = s.bounds();
        assert_eq!(b.y_min, 1.0);
        assert_eq!(b.y_max, 1.0);
        assert_eq!(b.x_max, 2.0);
    }

    #[test]
    fn append_truncates_to_shorter_side() {
        let mut s = Series::new(Color::Ansi(1));
        s.append(&[0.0, 1.0, 2.0], &[5.0, 6.0]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.xs(), &[0.0, 1.0]);
    }

    #[test]
    fn binary_search_window_with_duplicates() {
        let mut s = Series::new(Color::Ansi(1));
        s.append(&[0.0, 1.0, 1.0, 2.0, 3.0], &[0.0; 5]);
        assert_eq!(s.lower_bound(1.0), 1);
        assert_eq!(s.upper_bound(1.0), 3);
        assert_eq!(s.lower_bound(4.0), 5);
    }

    #[test]
    fn nearest_index_snaps_to_closest() {
        let mut s = Series::new(Color::Ansi(1));
        s.append(&[0.0, 10.0, 20.0], &[0.0; 3]);
        assert_eq!(s.nearest_index(2.0), Some(0));
        assert_eq!(s.nearest_index(16.0), Some(2));
        assert_eq!(s.nearest_index(-5.0), Some(0));
        assert_eq!(s.nearest_index(99.0), Some(2));
    }

    #[test]
    fn style_swap_is_visible_to_readers() {
        let s = Series::new(Color::Ansi(1));
        s.set_color(Color::Ansi(7));
        assert_eq!(s.color(), Color::Ansi(7));
    }

    #[test]
    fn union_of_empty_is_identity() {
        let empty = Bounds::default();
        let mut b = Bounds::default();
        b.extend(1.0, 2.0);
        assert_eq!(b.union(&empty), b);
        assert!(empty.is_empty());
    }
}
