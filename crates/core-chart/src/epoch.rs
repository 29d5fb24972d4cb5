//! Step-indexed multi-series line chart.
//!
//! Draw order is an explicit key list: the last key renders on top, and
//! because braille cells composite by opaque replacement the topmost series
//! keeps its own color wherever lines cross. The view range is managed
//! separately from the data domain: ingest widens the domain and, while the
//! user has not zoomed, mirrors it into the view; a zoom freezes the X view
//! until data forces a re-clamp.

use crate::series::{Bounds, Series};
use crate::fmt_value;
use core_render::braille::BrailleGrid;
use core_render::text::{clip_label, draw_text};
use core_render::{Color, Palette, Rect, Style, Surface};
use std::collections::HashMap;
use tracing::trace;

/// X domain never collapses below this many steps.
const DEFAULT_MAX_X: f64 = 20.0;
/// Fractional view change per wheel notch.
const ZOOM_STEP: f64 = 0.1;
/// Narrowest permitted X view, in steps.
const MIN_VIEW_RANGE: f64 = 5.0;
/// Zooming in at or past this mouse proportion keeps the data tail on screen.
const TAIL_ANCHOR_PROPORTION: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Active crosshair state. `mouse_px` is a graph-space pixel column; `data_x`
/// and `data_y` are the snapped sample on the topmost series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartInspection {
    pub mouse_px: u32,
    pub data_x: f64,
    pub data_y: f64,
}

pub struct EpochLineChart {
    title: String,
    series: HashMap<String, Series>,
    /// Render order; last entry draws on top.
    draw_order: Vec<String>,
    bounds: Bounds,
    palette: Palette,

    data_min_x: f64,
    data_max_x: f64,
    view_min_x: f64,
    view_max_x: f64,
    view_min_y: f64,
    view_max_y: f64,

    zoomed: bool,
    user_view_min_x: f64,
    user_view_max_x: f64,

    focused: bool,
    dirty: bool,
    inspection: Option<ChartInspection>,
    canvas: Surface,
}

impl EpochLineChart {
    pub fn new(title: impl Into<String>, palette: Palette) -> Self {
        Self {
            title: title.into(),
            series: HashMap::new(),
            draw_order: Vec::new(),
            bounds: Bounds::default(),
            palette,
            data_min_x: 0.0,
            data_max_x: DEFAULT_MAX_X,
            view_min_x: 0.0,
            view_max_x: DEFAULT_MAX_X,
            view_min_y: 0.0,
            view_max_y: 1.0,
            zoomed: false,
            user_view_min_x: 0.0,
            user_view_max_x: DEFAULT_MAX_X,
            focused: false,
            dirty: true,
            inspection: None,
            canvas: Surface::new(1, 1),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    pub fn canvas(&self) -> &Surface {
        &self.canvas
    }

    pub fn series_keys(&self) -> &[String] {
        &self.draw_order
    }

    pub fn series(&self, key: &str) -> Option<&Series> {
        self.series.get(key)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn inspection(&self) -> Option<&ChartInspection> {
        self.inspection.as_ref()
    }

    pub fn view_x(&self) -> (f64, f64) {
        (self.view_min_x, self.view_max_x)
    }

    pub fn view_y(&self) -> (f64, f64) {
        (self.view_min_y, self.view_max_y)
    }

    pub fn data_x(&self) -> (f64, f64) {
        (self.data_min_x, self.data_max_x)
    }

    // ---------------------------------------------------------------------
    // Ingest
    // ---------------------------------------------------------------------

    /// Append a batch to `key`, creating the series (at the top of the draw
    /// order) on first sight. Empty batches are a no-op.
    pub fn add_data(&mut self, key: &str, xs: &[f64], ys: &[f64]) {
        if xs.is_empty() && ys.is_empty() {
            return;
        }
        let series = self.series.entry(key.to_string()).or_insert_with(|| {
            self.draw_order.push(key.to_string());
            Series::new(self.palette.color_for_key(key))
        });
        series.append(xs, ys);
        self.bounds = self.bounds.union(&series.bounds());
        self.recompute_ranges();
        self.dirty = true;
    }

    /// Move `key` to the top of the draw order.
    pub fn promote_series_to_top(&mut self, key: &str) {
        if let Some(pos) = self.draw_order.iter().position(|k| k == key)
            && pos != self.draw_order.len() - 1
        {
            let k = self.draw_order.remove(pos);
            self.draw_order.push(k);
            self.dirty = true;
        }
    }

    /// Drop `key` and recompute aggregate bounds from the survivors.
    pub fn remove_series(&mut self, key: &str) -> bool {
        if self.series.remove(key).is_none() {
            return false;
        }
        self.draw_order.retain(|k| k != key);
        self.bounds = self
            .series
            .values()
            .fold(Bounds::default(), |acc, s| acc.union(&s.bounds()));
        self.recompute_ranges();
        self.dirty = true;
        true
    }

    pub fn has_series(&self) -> bool {
        !self.draw_order.is_empty()
    }

    // ---------------------------------------------------------------------
    // Ranges
    // ---------------------------------------------------------------------

    fn recompute_ranges(&mut self) {
        let b = self.bounds;

        // Y: pad the data extent so lines do not hug the frame.
        if b.y_min.is_finite() && b.y_max.is_finite() {
            let span = b.y_max - b.y_min;
            let padding = if span == 0.0 {
                flat_padding(b.y_max)
            } else {
                (span * 0.1).max(1e-6)
            };
            let mut new_min = b.y_min - padding;
            if b.y_min >= 0.0 {
                new_min = new_min.max(0.0);
            }
            self.view_min_y = new_min;
            self.view_max_y = b.y_max + padding;
        }

        // X: domain rounds up to a tens boundary, never below the default.
        let nice_max = if b.x_max.is_finite() {
            nice_ceil(b.x_max)
        } else {
            DEFAULT_MAX_X
        };
        self.data_min_x = if b.x_min.is_finite() { b.x_min } else { 0.0 };
        self.data_max_x = nice_max;

        if self.zoomed {
            // Keep the user's window, re-clamped to the (possibly grown)
            // domain.
            self.view_min_x = self.user_view_min_x.max(self.data_min_x);
            self.view_max_x = self.user_view_max_x.min(self.data_max_x);
            if self.view_min_x >= self.view_max_x {
                self.zoomed = false;
                self.view_min_x = self.data_min_x;
                self.view_max_x = self.data_max_x;
            }
        } else {
            self.view_min_x = self.data_min_x;
            self.view_max_x = self.data_max_x;
        }
    }

    // ---------------------------------------------------------------------
    // Zoom
    // ---------------------------------------------------------------------

    /// One wheel notch at graph pixel `mouse_px`. The data point under the
    /// cursor stays put; zooming in at the right edge anchors the data tail.
    pub fn handle_zoom(&mut self, direction: ZoomDirection, mouse_px: u32) {
        let width_px = self.graph_width_px();
        if width_px == 0 {
            return;
        }
        let view_range = self.view_max_x - self.view_min_x;
        if view_range <= 0.0 {
            return;
        }
        let proportion = (mouse_px as f64 / width_px as f64).clamp(0.0, 1.0);
        let anchor = self.view_min_x + proportion * view_range;

        let factor = match direction {
            ZoomDirection::In => 1.0 - ZOOM_STEP,
            ZoomDirection::Out => 1.0 + ZOOM_STEP,
        };
        let domain_range = (self.data_max_x - self.data_min_x).max(MIN_VIEW_RANGE);
        let new_range = (view_range * factor).clamp(MIN_VIEW_RANGE, domain_range);

        let mut new_min = anchor - new_range * proportion;
        let mut new_max = anchor + new_range * (1.0 - proportion);

        // Tail anchor: zooming in near the right edge must not let the
        // newest samples slide off screen.
        let x_max = self.bounds.x_max;
        if direction == ZoomDirection::In
            && proportion >= TAIL_ANCHOR_PROPORTION
            && x_max.is_finite()
        {
            let eps = 2.0 * new_range / width_px as f64;
            if new_max < x_max - eps {
                new_max = x_max;
                new_min = x_max - new_range;
            }
        }

        new_min = new_min.max(self.data_min_x);
        new_max = new_max.min(self.data_max_x);
        if new_min >= new_max {
            return;
        }

        trace!(
            target: "chart.zoom",
            title = self.title.as_str(),
            new_min,
            new_max,
            "zoom"
        );
        self.view_min_x = new_min;
        self.view_max_x = new_max;
        self.zoomed = true;
        self.user_view_min_x = new_min;
        self.user_view_max_x = new_max;
        self.dirty = true;
    }

    pub fn reset_zoom(&mut self) {
        if self.zoomed {
            self.zoomed = false;
            self.recompute_ranges();
            self.dirty = true;
        }
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn start_inspection(&mut self, mouse_px: u32) {
        self.update_inspection(mouse_px);
    }

    /// Re-snap the crosshair to the sample nearest the cursor on the topmost
    /// series.
    pub fn update_inspection(&mut self, mouse_px: u32) {
        let width_px = self.graph_width_px();
        if width_px == 0 {
            return;
        }
        let proportion = (mouse_px as f64 / width_px as f64).clamp(0.0, 1.0);
        let data_x = self.view_min_x + proportion * (self.view_max_x - self.view_min_x);
        self.snap_inspection(data_x, Some(mouse_px));
    }

    /// Synchronized inspection entry point: anchor at a broadcast data X.
    pub fn inspect_at_data_x(&mut self, data_x: f64) {
        let width_px = self.graph_width_px();
        if width_px == 0 {
            return;
        }
        self.snap_inspection(data_x, None);
    }

    fn snap_inspection(&mut self, data_x: f64, mouse_px: Option<u32>) {
        let Some(top_key) = self.draw_order.last() else {
            return;
        };
        let series = &self.series[top_key];
        let Some(idx) = series.nearest_index(data_x) else {
            return;
        };
        let sx = series.xs()[idx];
        let sy = series.ys()[idx];
        let px = mouse_px.unwrap_or_else(|| self.px_of_x(sx));
        self.inspection = Some(ChartInspection {
            mouse_px: px,
            data_x: sx,
            data_y: sy,
        });
        self.dirty = true;
    }

    pub fn end_inspection(&mut self) {
        if self.inspection.take().is_some() {
            self.dirty = true;
        }
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Width of the Y-axis label gutter, in cells.
    pub fn y_label_width(&self) -> u16 {
        let lo = fmt_value(self.view_min_y);
        let hi = fmt_value(self.view_max_y);
        let w = lo.len().max(hi.len()) as u16 + 1;
        w.min(self.canvas.width() / 3).max(2)
    }

    /// Cell column where the plot area starts.
    pub fn graph_left(&self) -> u16 {
        self.y_label_width() + 1
    }

    fn graph_width_cells(&self) -> u16 {
        self.canvas.width().saturating_sub(self.graph_left())
    }

    fn graph_height_cells(&self) -> u16 {
        self.canvas.height().saturating_sub(1)
    }

    /// Plot width in braille pixels.
    pub fn graph_width_px(&self) -> u32 {
        self.graph_width_cells() as u32 * 2
    }

    fn graph_height_px(&self) -> u32 {
        self.graph_height_cells() as u32 * 4
    }

    /// One horizontal pixel expressed in data units at the given view range.
    fn pixel_eps_x(&self, range: f64) -> f64 {
        let px = self.graph_width_px();
        if px == 0 { 0.0 } else { range / px as f64 }
    }

    fn px_of_x(&self, x: f64) -> u32 {
        let range = self.view_max_x - self.view_min_x;
        let width = self.graph_width_px();
        if range <= 0.0 || width == 0 {
            return 0;
        }
        let t = ((x - self.view_min_x) / range).clamp(0.0, 1.0);
        (t * (width - 1) as f64).round() as u32
    }

    fn py_of_y(&self, y: f64) -> u32 {
        let range = self.view_max_y - self.view_min_y;
        let height = self.graph_height_px();
        if range <= 0.0 || height == 0 {
            return 0;
        }
        let t = ((y - self.view_min_y) / range).clamp(0.0, 1.0);
        ((1.0 - t) * (height - 1) as f64).round() as u32
    }

    // ---------------------------------------------------------------------
    // Sizing
    // ---------------------------------------------------------------------

    /// No-op when dimensions are unchanged.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.canvas.width() && height == self.canvas.height() {
            return;
        }
        self.canvas.resize(width, height);
        self.recompute_ranges();
        self.dirty = true;
    }

    /// Release the canvas backing store while off-screen.
    pub fn park(&mut self) {
        self.resize(1, 1);
    }

    // ---------------------------------------------------------------------
    // Draw
    // ---------------------------------------------------------------------

    /// Render into the owned canvas and clear the dirty flag.
    pub fn draw(&mut self) {
        self.canvas.clear();
        let graph_w = self.graph_width_cells();
        let graph_h = self.graph_height_cells();
        if graph_w == 0 || graph_h == 0 {
            self.dirty = false;
            return;
        }
        self.draw_axes();

        let graph_region = Rect::new(self.graph_left(), 0, graph_w, graph_h);
        let view_range = self.view_max_x - self.view_min_x;
        let eps = self.pixel_eps_x(view_range);

        for key in self.draw_order.clone() {
            let series = &self.series[&key];
            let lb = series.lower_bound(self.view_min_x);
            let ub = series.upper_bound(self.view_max_x + eps);
            let count = ub.saturating_sub(lb);
            if count == 0 {
                continue;
            }
            let color = series.color();
            let mut grid = BrailleGrid::new(graph_w, graph_h);
            if count == 1 {
                let (x, y) = (series.xs()[lb], series.ys()[lb]);
                if x.is_finite() && y.is_finite() {
                    grid.set(self.px_of_x(x), self.py_of_y(y));
                }
            } else {
                let mut prev: Option<(u32, u32)> = None;
                for i in lb..ub {
                    let (x, y) = (series.xs()[i], series.ys()[i]);
                    if !x.is_finite() || !y.is_finite() {
                        // Break the line at ill-formed samples.
                        prev = None;
                        continue;
                    }
                    let p = (self.px_of_x(x), self.py_of_y(y));
                    match prev {
                        Some((px, py)) => grid.line(px, py, p.0, p.1),
                        None => grid.set(p.0, p.1),
                    }
                    prev = Some(p);
                }
            }
            grid.composite(&mut self.canvas, graph_region, color);
        }

        self.draw_inspection(graph_region);
        self.dirty = false;
    }

    fn draw_axes(&mut self) {
        let label_w = self.y_label_width();
        let axis_col = self.graph_left() - 1;
        let graph_h = self.graph_height_cells();
        let axis_style = Style::dim();

        for y in 0..graph_h {
            self.canvas.set(axis_col, y, '│', axis_style);
        }

        let hi = fmt_value(self.view_max_y);
        let lo = fmt_value(self.view_min_y);
        self.draw_right_aligned(&hi, 0, label_w, axis_style);
        if graph_h > 2 {
            let mid = (self.view_min_y + self.view_max_y) / 2.0;
            self.draw_right_aligned(&fmt_value(mid), graph_h / 2, label_w, axis_style);
        }
        if graph_h > 1 {
            self.draw_right_aligned(&lo, graph_h - 1, label_w, axis_style);
        }

        // X labels on the bottom row.
        let y = self.canvas.height() - 1;
        let left = fmt_value(self.view_min_x);
        let right = fmt_value(self.view_max_x);
        let gx = self.graph_left();
        let cw = self.canvas.width();
        draw_text(
            &mut self.canvas,
            gx,
            y,
            &left,
            axis_style,
            cw,
        );
        let rx = self
            .canvas
            .width()
            .saturating_sub(right.len() as u16);
        let cw = self.canvas.width();
        draw_text(&mut self.canvas, rx, y, &right, axis_style, cw);
    }

    fn draw_right_aligned(&mut self, text: &str, y: u16, width: u16, style: Style) {
        let label = clip_label(text, width);
        let len = label.chars().count() as u16;
        let x = width.saturating_sub(len);
        draw_text(&mut self.canvas, x, y, &label, style, width);
    }

    fn draw_inspection(&mut self, graph: Rect) {
        let Some(inspect) = self.inspection else {
            return;
        };
        let hair_col = graph.x + (inspect.mouse_px / 2).min(graph.w.saturating_sub(1) as u32) as u16;
        let hair_style = Style::dim();
        for y in graph.y..graph.y + graph.h {
            self.canvas.set(hair_col, y, '┆', hair_style);
        }

        // Legend lines, topmost series first.
        let mut lines: Vec<(String, Color)> = Vec::with_capacity(self.draw_order.len() + 1);
        lines.push((format!("step {}", fmt_value(inspect.data_x)), Color::Reset));
        for key in self.draw_order.iter().rev() {
            let series = &self.series[key];
            let Some(idx) = series.nearest_index(inspect.data_x) else {
                continue;
            };
            lines.push((
                format!("{key} {}", fmt_value(series.ys()[idx])),
                series.color(),
            ));
        }

        let legend_w = lines
            .iter()
            .map(|(l, _)| l.chars().count() as u16)
            .max()
            .unwrap_or(0)
            .min(graph.w);
        let legend_h = (lines.len() as u16).min(graph.h);
        // Right of the hairline when it fits, else left.
        let legend_x = if hair_col + 2 + legend_w <= graph.x + graph.w {
            hair_col + 2
        } else {
            hair_col.saturating_sub(legend_w + 1).max(graph.x)
        };
        let legend_y = graph.y + (graph.h.saturating_sub(legend_h)) / 2;

        for (i, (line, color)) in lines.iter().take(legend_h as usize).enumerate() {
            let style = if *color == Color::Reset {
                Style::bold(Color::Reset)
            } else {
                Style::fg(*color)
            };
            draw_text(
                &mut self.canvas,
                legend_x,
                legend_y + i as u16,
                line,
                style,
                legend_w,
            );
        }
    }
}

/// Padding for a flat (zero-span) Y extent, scaled to the magnitude.
fn flat_padding(y: f64) -> f64 {
    let a = y.abs();
    if a < 0.001 {
        (a * 0.1).max(1e-4)
    } else if a < 0.1 {
        a * 0.1
    } else {
        0.1
    }
}

/// Round up to the next multiple of ten, never below the default domain.
fn nice_ceil(x_max: f64) -> f64 {
    let ceiled = x_max.ceil();
    let rounded = (ceiled / 10.0).ceil() * 10.0;
    rounded.max(DEFAULT_MAX_X)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::ColorScheme;

    fn chart() -> EpochLineChart {
        let mut c = EpochLineChart::new("loss", ColorScheme::Default.palette());
        c.resize(60, 12);
        c
    }

    #[test]
    fn two_points_pad_the_view() {
        let mut c = chart();
        c.add_data("loss", &[0.0, 1.0], &[0.5, 1.0]);
        let (min_y, max_y) = c.view_y();
        assert!(min_y < 0.5, "view floor must sit below data, got {min_y}");
        assert!(max_y > 1.0, "view ceiling must sit above data, got {max_y}");
    }

    #[test]
    fn negative_free_data_never_pads_below_zero() {
        let mut c = chart();
        c.add_data("acc", &[0.0, 1.0], &[0.01, 0.02]);
        assert!(c.view_y().0 >= 0.0);
    }

    #[test]
    fn domain_rounds_to_tens() {
        let mut c = chart();
        let xs: Vec<f64> = (0..21).map(|i| (i + 2) as f64).collect();
        let ys: Vec<f64> = (0..21).map(|i| i as f64).collect();
        c.add_data("m", &xs, &ys);
        assert_eq!(c.data_x().1, 30.0);
        assert_eq!(c.view_x().1, 30.0);
    }

    #[test]
    fn small_domain_holds_default_twenty() {
        let mut c = chart();
        c.add_data("m", &[0.0, 3.0], &[1.0, 2.0]);
        assert_eq!(c.data_x().1, 20.0);
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut c = chart();
        c.add_data("ghost", &[], &[]);
        assert!(!c.has_series());
    }

    #[test]
    fn zoom_in_center_is_stable() {
        let mut c = chart();
        let xs: Vec<f64> = (0..40).map(f64::from).collect();
        let ys = vec![1.0; 40];
        c.add_data("m", &xs, &ys);
        let (old_min, old_max) = c.view_x();
        let old_mid = (old_min + old_max) / 2.0;
        let old_range = old_max - old_min;

        // Mouse at half of the graph width.
        c.handle_zoom(ZoomDirection::In, c.graph_width_px() / 2);
        let (new_min, new_max) = c.view_x();
        let new_mid = (new_min + new_max) / 2.0;
        assert!(
            (new_mid - old_mid).abs() <= old_range * 0.2,
            "zoom must not recenter: {old_mid} -> {new_mid}"
        );
        assert!(c.is_zoomed());
    }

    #[test]
    fn zoom_in_at_right_edge_anchors_tail() {
        let mut c = EpochLineChart::new("tail", ColorScheme::Default.palette());
        c.resize(120, 12);
        let xs: Vec<f64> = (0..40).map(f64::from).collect();
        let ys = vec![0.5; 40];
        c.add_data("m", &xs, &ys);

        let px = (c.graph_width_px() as f64 * 0.96) as u32;
        c.handle_zoom(ZoomDirection::In, px);
        let (_, view_max) = c.view_x();
        assert!(
            (view_max - 39.0).abs() < 1.0,
            "tail must stay visible, view_max = {view_max}"
        );
        assert!(view_max >= 39.0 - 1.0);
    }

    #[test]
    fn zoom_range_clamps_to_minimum() {
        let mut c = chart();
        let xs: Vec<f64> = (0..40).map(f64::from).collect();
        c.add_data("m", &xs, &vec![1.0; 40]);
        for _ in 0..200 {
            c.handle_zoom(ZoomDirection::In, c.graph_width_px() / 2);
        }
        let (min, max) = c.view_x();
        assert!(max - min >= MIN_VIEW_RANGE - 1e-9);
    }

    #[test]
    fn remove_series_recomputes_bounds() {
        let mut c = chart();
        c.add_data("a", &[0.0, 1.0], &[0.0, 10.0]);
        c.add_data("b", &[0.0, 1.0], &[0.0, 100.0]);
        assert_eq!(c.bounds().y_max, 100.0);
        assert!(c.remove_series("b"));
        assert_eq!(c.bounds().y_max, 10.0);
        assert!(!c.remove_series("b"));
    }

    #[test]
    fn promote_moves_key_to_top() {
        let mut c = chart();
        c.add_data("a", &[0.0], &[1.0]);
        c.add_data("b", &[0.0], &[2.0]);
        assert_eq!(c.series_keys(), ["a", "b"]);
        c.promote_series_to_top("a");
        assert_eq!(c.series_keys(), ["b", "a"]);
    }

    #[test]
    fn inspection_snaps_to_topmost_series_sample() {
        let mut c = chart();
        c.add_data("bottom", &[0.0, 10.0], &[0.0, 0.0]);
        c.add_data("top", &[0.0, 10.0, 20.0], &[5.0, 6.0, 7.0]);
        c.start_inspection(c.graph_width_px() / 2);
        let inspect = c.inspection().expect("active after start");
        assert_eq!(inspect.data_y, 6.0, "snap must use the topmost series");
        c.end_inspection();
        assert!(c.inspection().is_none());
    }

    #[test]
    fn park_releases_canvas_and_draw_survives() {
        let mut c = chart();
        c.add_data("m", &[0.0, 1.0], &[0.0, 1.0]);
        c.park();
        assert_eq!(c.canvas().width(), 1);
        c.draw();
        c.resize(40, 10);
        c.draw();
        assert!(!c.is_dirty());
    }

    #[test]
    fn identical_keys_get_identical_default_colors() {
        let palette = ColorScheme::Default.palette();
        let mut a = EpochLineChart::new("one", palette);
        let mut b = EpochLineChart::new("two", palette);
        a.resize(40, 10);
        b.resize(40, 10);
        a.add_data("train/loss", &[0.0], &[1.0]);
        b.add_data("train/loss", &[0.0], &[1.0]);
        assert_eq!(
            a.series("train/loss").unwrap().color(),
            b.series("train/loss").unwrap().color()
        );
    }

    #[test]
    fn ingest_same_batch_twice_keeps_bounds() {
        let mut c = chart();
        c.add_data("m", &[0.0, 1.0], &[2.0, 3.0]);
        let before = c.bounds();
        c.add_data("m", &[0.0, 1.0], &[2.0, 3.0]);
        assert_eq!(c.bounds(), before);
    }
}
