//! System-telemetry grid for the right sidebar.
//!
//! Hierarchical metric names collapse into family charts: every
//! `gpu.<n>.temp` sample lands on one `gpu.temp` chart as sub-series
//! `GPU <n>`, per-device disk I/O collapses into `disk.io_per_device`, and
//! anything unrecognized becomes its own single-series chart under the
//! reserved `"Default"` series name.

use crate::panel::GridNavigator;
use core_chart::TimeSeriesLineChart;
use core_chart::timeseries::DEFAULT_SERIES;
use core_events::StatsUpdate;
use core_render::text::{clip_label, draw_border};
use core_render::{ColorScheme, Rect, Style, Surface};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

/// Family + sub-series labels extracted from one metric name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricKey {
    pub family: String,
    pub series: String,
}

static GPU_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gpu\.(\d+)\.(.+)$").expect("static pattern"));
static CPU_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^cpu\.(\d+)\.(.+)$").expect("static pattern"));
static DISK_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^disk\.([^.]+)\.(in|out)$").expect("static pattern"));
static NETWORK_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^network\.(sent|recv)$").expect("static pattern"));

/// Classify a metric name into its chart family and sub-series label.
pub fn classify_metric(name: &str) -> MetricKey {
    if let Some(caps) = GPU_RULE.captures(name) {
        return MetricKey {
            family: format!("gpu.{}", &caps[2]),
            series: format!("GPU {}", &caps[1]),
        };
    }
    if let Some(caps) = CPU_RULE.captures(name) {
        return MetricKey {
            family: format!("cpu.{}", &caps[2]),
            series: format!("CPU {}", &caps[1]),
        };
    }
    if let Some(caps) = DISK_RULE.captures(name) {
        return MetricKey {
            family: "disk.io_per_device".to_string(),
            series: format!("{} {}", &caps[1], &caps[2]),
        };
    }
    if let Some(caps) = NETWORK_RULE.captures(name) {
        return MetricKey {
            family: "network".to_string(),
            series: caps[1].to_string(),
        };
    }
    MetricKey {
        family: name.to_string(),
        series: DEFAULT_SERIES.to_string(),
    }
}

/// Percentage-shaped metrics pin their Y axis to 0..100.
fn is_percentage(family: &str) -> bool {
    family.contains("percent") || family.ends_with(".usage")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemColorMode {
    /// Each new chart steps the palette; its sub-series step further.
    #[default]
    PerPlot,
    /// Every chart anchors at the base color; only multi-series charts
    /// differentiate.
    PerSeries,
}

pub struct SystemMetricsGrid {
    charts: Vec<TimeSeriesLineChart>,
    by_family: HashMap<String, usize>,
    last_drawn: HashSet<String>,
    nav: GridNavigator,
    cfg_rows: u16,
    cfg_cols: u16,
    viewport: Rect,
    scheme: ColorScheme,
    color_mode: SystemColorMode,
    charts_created: usize,
}

pub const MIN_CELL_W: u16 = 20;
pub const MIN_CELL_H: u16 = 6;
pub const HEADER_LINES: u16 = 1;

impl SystemMetricsGrid {
    pub fn new(cfg_rows: u16, cfg_cols: u16, scheme: ColorScheme, mode: SystemColorMode) -> Self {
        Self {
            charts: Vec::new(),
            by_family: HashMap::new(),
            last_drawn: HashSet::new(),
            nav: GridNavigator::default(),
            cfg_rows,
            cfg_cols,
            viewport: Rect::default(),
            scheme,
            color_mode: mode,
            charts_created: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn chart_by_family(&self, family: &str) -> Option<&TimeSeriesLineChart> {
        self.by_family.get(family).map(|&i| &self.charts[i])
    }

    pub fn set_grid_config(&mut self, rows: u16, cols: u16) {
        self.cfg_rows = rows.clamp(1, 9);
        self.cfg_cols = cols.clamp(1, 9);
        self.load_page();
    }

    pub fn grid_config(&self) -> (u16, u16) {
        (self.cfg_rows, self.cfg_cols)
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.load_page();
        }
    }

    /// Ingest one telemetry sample batch.
    pub fn process_stats(&mut self, update: &StatsUpdate) {
        let mut created = false;
        for (name, value) in &update.metrics {
            let key = classify_metric(name);
            let idx = match self.by_family.get(&key.family) {
                Some(&i) => i,
                None => {
                    let base_index = match self.color_mode {
                        SystemColorMode::PerPlot => self.charts_created,
                        SystemColorMode::PerSeries => 0,
                    };
                    self.charts_created += 1;
                    let mut chart = TimeSeriesLineChart::new(
                        key.family.clone(),
                        self.scheme.palette(),
                        base_index,
                    );
                    chart.set_percentage(is_percentage(&key.family));
                    self.charts.push(chart);
                    let idx = self.charts.len() - 1;
                    self.by_family.insert(key.family.clone(), idx);
                    created = true;
                    debug!(
                        target: "grid.system",
                        family = key.family.as_str(),
                        "telemetry_chart_created"
                    );
                    idx
                }
            };
            self.charts[idx].add_data_point(&key.series, update.timestamp, *value);
        }

        if created {
            self.resort();
        }
        self.load_page();
    }

    fn resort(&mut self) {
        self.charts.sort_by(|a, b| a.title().cmp(b.title()));
        self.by_family.clear();
        for (i, chart) in self.charts.iter().enumerate() {
            self.by_family.insert(chart.title().to_string(), i);
        }
    }

    pub fn navigate(&mut self, delta: isize) {
        let ipp = self.items_per_page();
        self.nav.set_counts(self.charts.len(), ipp);
        self.nav.navigate(delta);
        self.load_page();
    }

    fn items_per_page(&self) -> usize {
        let (rows, cols) = crate::panel::effective_grid_size(
            self.cfg_rows,
            self.cfg_cols,
            self.viewport.w,
            self.viewport.h,
            MIN_CELL_W,
            MIN_CELL_H,
            HEADER_LINES,
        );
        rows as usize * cols as usize
    }

    fn load_page(&mut self) {
        let ipp = self.items_per_page();
        self.nav.set_counts(self.charts.len(), ipp);
        let (start, end) = self.nav.page_range(self.charts.len(), ipp);

        let now_visible: HashSet<String> = (start..end)
            .map(|i| self.charts[i].title().to_string())
            .collect();
        for family in self.last_drawn.difference(&now_visible) {
            if let Some(&idx) = self.by_family.get(family) {
                self.charts[idx].park();
            }
        }
        self.last_drawn = now_visible;

        let (cell_w, cell_h) = self.cell_size();
        for i in start..end {
            self.charts[i].resize(cell_w.saturating_sub(2), cell_h.saturating_sub(2));
        }
    }

    fn cell_size(&self) -> (u16, u16) {
        let (rows, cols) = crate::panel::effective_grid_size(
            self.cfg_rows,
            self.cfg_cols,
            self.viewport.w,
            self.viewport.h,
            MIN_CELL_W,
            MIN_CELL_H,
            HEADER_LINES,
        );
        let w = self.viewport.w / cols;
        let h = self.viewport.h.saturating_sub(HEADER_LINES) / rows;
        (w, h)
    }

    pub fn header_text(&self) -> String {
        let total = self.charts.len();
        if total == 0 {
            return String::new();
        }
        let (start, end) = self.nav.page_range(total, self.items_per_page());
        format!("[{}-{} of {}]", start + 1, end, total)
    }

    pub fn render(&mut self, surface: &mut Surface) {
        let ipp = self.items_per_page();
        let (start, end) = self.nav.page_range(self.charts.len(), ipp);
        for i in start..end {
            if self.charts[i].is_dirty() {
                self.charts[i].draw();
            }
        }

        let header = self.header_text();
        if !header.is_empty() {
            let x = self
                .viewport
                .x
                .saturating_add(self.viewport.w.saturating_sub(header.len() as u16));
            core_render::text::draw_text(
                surface,
                x,
                self.viewport.y,
                &header,
                Style::dim(),
                self.viewport.w,
            );
        }

        let (rows, cols) = crate::panel::effective_grid_size(
            self.cfg_rows,
            self.cfg_cols,
            self.viewport.w,
            self.viewport.h,
            MIN_CELL_W,
            MIN_CELL_H,
            HEADER_LINES,
        );
        let (cell_w, cell_h) = self.cell_size();
        for (slot, i) in (start..end).enumerate() {
            let r = slot as u16 / cols;
            let c = slot as u16 % cols;
            if r >= rows {
                break;
            }
            let rect = Rect::new(
                self.viewport.x + c * cell_w,
                self.viewport.y + HEADER_LINES + r * cell_h,
                cell_w,
                cell_h,
            );
            let chart = &self.charts[i];
            let title = clip_label(chart.title(), rect.w.saturating_sub(4));
            draw_border(surface, rect, Style::dim(), Some(&title));
            let inner = rect.inner();
            surface.blit(chart.canvas(), inner.x, inner.y);
        }
    }
}
