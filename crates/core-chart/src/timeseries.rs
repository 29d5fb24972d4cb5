//! Timestamp-indexed telemetry chart.
//!
//! One chart per metric family (`gpu.temp`, `disk.io_per_device`, ...), with
//! one sub-series per device. The reserved `"Default"` series name is the
//! singleton used when a family has no per-device fan-out. The view is a
//! rolling window ending just past the newest sample; samples older than the
//! window stay stored but scroll out of view.

use crate::series::{Bounds, Series};
use crate::fmt_value;
use chrono::{Local, TimeZone};
use core_render::braille::BrailleGrid;
use core_render::text::{clip_label, draw_text};
use core_render::{Palette, Rect, Style, Surface};
use std::collections::HashMap;

/// Reserved singleton series name.
pub const DEFAULT_SERIES: &str = "Default";
/// Rolling view width, seconds.
const WINDOW_SECS: f64 = 600.0;
/// Headroom past the newest sample so the line does not touch the frame.
const FUTURE_BUFFER_SECS: f64 = 10.0;

pub struct TimeSeriesLineChart {
    title: String,
    series: HashMap<String, Series>,
    draw_order: Vec<String>,
    bounds: Bounds,
    latest_ts: f64,

    view_min_x: f64,
    view_max_x: f64,
    view_min_y: f64,
    view_max_y: f64,

    auto_range: bool,
    /// Percentage metrics pin the Y range to 0..100.
    percentage: bool,

    palette: Palette,
    /// Palette slot this chart's colors are anchored at; sub-series step
    /// forward from here.
    base_color_index: usize,
    next_color_offset: usize,

    focused: bool,
    dirty: bool,
    canvas: Surface,
}

impl TimeSeriesLineChart {
    pub fn new(title: impl Into<String>, palette: Palette, base_color_index: usize) -> Self {
        Self {
            title: title.into(),
            series: HashMap::new(),
            draw_order: Vec::new(),
            bounds: Bounds::default(),
            latest_ts: f64::NEG_INFINITY,
            view_min_x: 0.0,
            view_max_x: WINDOW_SECS,
            view_min_y: 0.0,
            view_max_y: 1.0,
            auto_range: true,
            percentage: false,
            palette,
            base_color_index,
            next_color_offset: 0,
            focused: false,
            dirty: true,
            canvas: Surface::new(1, 1),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn canvas(&self) -> &Surface {
        &self.canvas
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

    pub fn set_percentage(&mut self, percentage: bool) {
        if self.percentage != percentage {
            self.percentage = percentage;
            self.refresh_ranges();
            self.dirty = true;
        }
    }

    pub fn series_names(&self) -> &[String] {
        &self.draw_order
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    pub fn view_x(&self) -> (f64, f64) {
        (self.view_min_x, self.view_max_x)
    }

    pub fn view_y(&self) -> (f64, f64) {
        (self.view_min_y, self.view_max_y)
    }

    /// Append one sample to a named sub-series, creating it on first sight
    /// with the next chart-local color.
    pub fn add_data_point(&mut self, series_name: &str, ts: f64, value: f64) {
        if !ts.is_finite() {
            return;
        }
        let series = self
            .series
            .entry(series_name.to_string())
            .or_insert_with(|| {
                self.draw_order.push(series_name.to_string());
                let color = self
                    .palette
                    .color(self.base_color_index + self.next_color_offset);
                self.next_color_offset += 1;
                Series::new(color)
            });
        series.push(ts, value);
        self.bounds.extend(ts, value);
        if ts > self.latest_ts {
            self.latest_ts = ts;
        }
        self.refresh_ranges();
        self.dirty = true;
    }

    fn refresh_ranges(&mut self) {
        if self.latest_ts.is_finite() {
            self.view_max_x = self.latest_ts + FUTURE_BUFFER_SECS;
            self.view_min_x = self.view_max_x - WINDOW_SECS;
        }

        if self.percentage {
            self.view_min_y = 0.0;
            self.view_max_y = 100.0;
            return;
        }
        if !self.auto_range || self.bounds.is_empty() {
            return;
        }
        let span = self.bounds.y_max - self.bounds.y_min;
        let padding = (span * 0.1).max(1e-6);
        let mut min = self.bounds.y_min - padding;
        if self.bounds.y_min >= 0.0 {
            min = min.max(0.0);
        }
        self.view_min_y = min;
        self.view_max_y = self.bounds.y_max + padding;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.canvas.width() && height == self.canvas.height() {
            return;
        }
        self.canvas.resize(width, height);
        self.dirty = true;
    }

    pub fn park(&mut self) {
        self.resize(1, 1);
    }

    fn y_label_width(&self) -> u16 {
        let lo = fmt_value(self.view_min_y);
        let hi = fmt_value(self.view_max_y);
        let w = lo.len().max(hi.len()) as u16 + 1;
        w.min(self.canvas.width() / 3).max(2)
    }

    fn graph_left(&self) -> u16 {
        self.y_label_width() + 1
    }

    fn graph_width_cells(&self) -> u16 {
        self.canvas.width().saturating_sub(self.graph_left())
    }

    fn graph_height_cells(&self) -> u16 {
        self.canvas.height().saturating_sub(1)
    }

    fn px_of_x(&self, x: f64, width_px: u32) -> u32 {
        let range = self.view_max_x - self.view_min_x;
        if range <= 0.0 || width_px == 0 {
            return 0;
        }
        let t = ((x - self.view_min_x) / range).clamp(0.0, 1.0);
        (t * (width_px - 1) as f64).round() as u32
    }

    fn py_of_y(&self, y: f64, height_px: u32) -> u32 {
        let range = self.view_max_y - self.view_min_y;
        if range <= 0.0 || height_px == 0 {
            return 0;
        }
        let t = ((y - self.view_min_y) / range).clamp(0.0, 1.0);
        ((1.0 - t) * (height_px - 1) as f64).round() as u32
    }

    pub fn draw(&mut self) {
        self.canvas.clear();
        let graph_w = self.graph_width_cells();
        let graph_h = self.graph_height_cells();
        if graph_w == 0 || graph_h == 0 {
            self.dirty = false;
            return;
        }
        self.draw_axes();

        let region = Rect::new(self.graph_left(), 0, graph_w, graph_h);
        let width_px = graph_w as u32 * 2;
        let height_px = graph_h as u32 * 4;

        for name in self.draw_order.clone() {
            let series = &self.series[&name];
            let lb = series.lower_bound(self.view_min_x);
            let ub = series.upper_bound(self.view_max_x);
            if ub <= lb {
                continue;
            }
            let color = series.color();
            let mut grid = BrailleGrid::new(graph_w, graph_h);
            let mut prev: Option<(u32, u32)> = None;
            for i in lb..ub {
                let (x, y) = (series.xs()[i], series.ys()[i]);
                if !y.is_finite() {
                    prev = None;
                    continue;
                }
                let p = (self.px_of_x(x, width_px), self.py_of_y(y, height_px));
                match prev {
                    Some((px, py)) => grid.line(px, py, p.0, p.1),
                    None => grid.set(p.0, p.1),
                }
                prev = Some(p);
            }
            grid.composite(&mut self.canvas, region, color);
        }
        self.dirty = false;
    }

    fn draw_axes(&mut self) {
        let label_w = self.y_label_width();
        let axis_col = self.graph_left() - 1;
        let graph_h = self.graph_height_cells();
        let style = Style::dim();

        for y in 0..graph_h {
            self.canvas.set(axis_col, y, '│', style);
        }
        self.draw_right_aligned(&fmt_value(self.view_max_y), 0, label_w, style);
        if graph_h > 1 {
            self.draw_right_aligned(&fmt_value(self.view_min_y), graph_h - 1, label_w, style);
        }

        let y = self.canvas.height() - 1;
        let left = clock_label(self.view_min_x);
        let right = clock_label(self.view_max_x);
        let gx = self.graph_left();
        let cw = self.canvas.width();
        draw_text(&mut self.canvas, gx, y, &left, style, cw);
        let rx = self.canvas.width().saturating_sub(right.len() as u16);
        let cw = self.canvas.width();
        draw_text(&mut self.canvas, rx, y, &right, style, cw);
    }

    fn draw_right_aligned(&mut self, text: &str, y: u16, width: u16, style: Style) {
        let label = clip_label(text, width);
        let len = label.chars().count() as u16;
        let x = width.saturating_sub(len);
        draw_text(&mut self.canvas, x, y, &label, style, width);
    }
}

/// HH:MM:SS in local time; sub-epoch or absurd values print raw seconds.
fn clock_label(unix_secs: f64) -> String {
    if !unix_secs.is_finite() || unix_secs < 0.0 {
        return fmt_value(unix_secs);
    }
    match Local.timestamp_opt(unix_secs as i64, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%H:%M:%S").to_string(),
        _ => fmt_value(unix_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::ColorScheme;

    fn chart() -> TimeSeriesLineChart {
        let mut c =
            TimeSeriesLineChart::new("gpu.temp", ColorScheme::Default.palette(), 0);
        c.resize(50, 8);
        c
    }

    #[test]
    fn window_tracks_latest_sample() {
        let mut c = chart();
        c.add_data_point("GPU 0", 1_000.0, 55.0);
        c.add_data_point("GPU 0", 1_600.0, 60.0);
        let (min_x, max_x) = c.view_x();
        assert_eq!(max_x, 1_610.0);
        assert_eq!(max_x - min_x, 600.0);
    }

    #[test]
    fn auto_range_pads_ten_percent() {
        let mut c = chart();
        c.add_data_point(DEFAULT_SERIES, 100.0, 10.0);
        c.add_data_point(DEFAULT_SERIES, 110.0, 20.0);
        let (min_y, max_y) = c.view_y();
        assert!((max_y - 21.0).abs() < 1e-9);
        assert!((min_y - 9.0).abs() < 1e-9);
    }

    #[test]
    fn percentage_pins_zero_to_hundred() {
        let mut c = chart();
        c.set_percentage(true);
        c.add_data_point(DEFAULT_SERIES, 100.0, 350.0);
        assert_eq!(c.view_y(), (0.0, 100.0));
    }

    #[test]
    fn sub_series_step_the_chart_palette() {
        let palette = ColorScheme::Default.palette();
        let mut c = TimeSeriesLineChart::new("gpu.temp", palette, 3);
        c.resize(50, 8);
        c.add_data_point("GPU 0", 1.0, 40.0);
        c.add_data_point("GPU 1", 1.0, 45.0);
        assert_eq!(c.series("GPU 0").unwrap().color(), palette.color(3));
        assert_eq!(c.series("GPU 1").unwrap().color(), palette.color(4));
        assert_eq!(c.series_names(), ["GPU 0", "GPU 1"]);
    }

    #[test]
    fn non_finite_timestamps_are_dropped() {
        let mut c = chart();
        c.add_data_point(DEFAULT_SERIES, f64::NAN, 1.0);
        assert!(c.series(DEFAULT_SERIES).is_none());
    }
}
