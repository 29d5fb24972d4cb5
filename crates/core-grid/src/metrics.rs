//! Filterable, paginated collection of metric charts.
//!
//! Chart list invariants, holding at every observable moment:
//! - `charts` is sorted alphabetically by title;
//! - `by_title` maps exactly the titles of `charts` to their indices;
//! - `filtered` equals the full index range iff no filter query applies;
//! - every cell of the current page references an entry of `filtered`;
//! - the focus is either unset or a valid cell of the current page.
//!
//! Charts that scroll off the page are parked (canvas shrunk to 1×1) and
//! resized back on return, so memory tracks the visible set, not the run's
//! full metric count.

use crate::filter::FilterState;
use crate::panel::{GridNavigator, compute_grid_dims, effective_grid_size};
use core_chart::{EpochLineChart, ZoomDirection};
use core_events::{HistoryUpdate, MouseButton, MouseEventKind, MouseMsg};
use core_render::text::draw_text;
use core_render::{Color, ColorScheme, Palette, Rect, Style, Surface, text};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub const MIN_CELL_W: u16 = 24;
pub const MIN_CELL_H: u16 = 8;
pub const HEADER_LINES: u16 = 1;

/// How series inside the charts are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesColorMode {
    /// Each chart owns one stable color; all its series share it.
    #[default]
    PerPlot,
    /// Each series key owns one stable color across every chart (one color
    /// per run in the workspace view).
    PerSeries,
}

pub struct MetricsGrid {
    charts: Vec<EpochLineChart>,
    by_title: HashMap<String, usize>,
    /// Indices into `charts`, in display order.
    filtered: Vec<usize>,
    /// Cell -> index into `charts` for the loaded page.
    page_cells: Vec<Vec<Option<usize>>>,
    last_drawn: HashSet<String>,

    focus: Option<(usize, usize)>,
    focus_title: Option<String>,

    pub filter: FilterState,

    color_of_title: HashMap<String, Color>,
    color_of_series: HashMap<String, Color>,
    next_color: usize,
    palette: Palette,
    color_mode: SeriesColorMode,

    nav: GridNavigator,
    cfg_rows: u16,
    cfg_cols: u16,
    viewport: Rect,
    sync_inspect: bool,
}

impl MetricsGrid {
    pub fn new(cfg_rows: u16, cfg_cols: u16, scheme: ColorScheme, mode: SeriesColorMode) -> Self {
        Self {
            charts: Vec::new(),
            by_title: HashMap::new(),
            filtered: Vec::new(),
            page_cells: Vec::new(),
            last_drawn: HashSet::new(),
            focus: None,
            focus_title: None,
            filter: FilterState::default(),
            color_of_title: HashMap::new(),
            color_of_series: HashMap::new(),
            next_color: 0,
            palette: scheme.palette(),
            color_mode: mode,
            nav: GridNavigator::default(),
            cfg_rows,
            cfg_cols,
            viewport: Rect::default(),
            sync_inspect: false,
        }
    }

    // ---------------------------------------------------------------------
    // Introspection
    // ---------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.charts.iter().map(|c| c.title())
    }

    pub fn chart_by_title(&self, title: &str) -> Option<&EpochLineChart> {
        self.by_title.get(title).map(|&i| &self.charts[i])
    }

    pub fn focus(&self) -> Option<(usize, usize)> {
        self.focus
    }

    pub fn focused_title(&self) -> Option<&str> {
        self.focus_title.as_deref()
    }

    pub fn current_page(&self) -> usize {
        self.nav.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.nav.total_pages()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn sync_inspect_active(&self) -> bool {
        self.sync_inspect
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

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

    // ---------------------------------------------------------------------
    // Ingest
    // ---------------------------------------------------------------------

    /// Ingest one history batch under `series_key`. Creates charts for new
    /// titles, keeps the list sorted, reapplies any active filter, and
    /// preserves focus across the resort.
    pub fn process_history(&mut self, update: &HistoryUpdate, series_key: &str) {
        let mut created = false;
        for (title, points) in &update.metrics {
            let idx = match self.by_title.get(title) {
                Some(&i) => i,
                None => {
                    let chart = EpochLineChart::new(title.clone(), self.palette);
                    self.charts.push(chart);
                    let idx = self.charts.len() - 1;
                    self.by_title.insert(title.clone(), idx);
                    created = true;
                    idx
                }
            };
            self.charts[idx].add_data(series_key, &points.xs, &points.ys);
        }

        if created {
            self.resort();
        }
        self.apply_colors(update, series_key);
        self.refresh_filtered();
        self.load_page();
    }

    /// Re-sort `charts` by title and rebuild the index.
    fn resort(&mut self) {
        self.charts.sort_by(|a, b| a.title().cmp(b.title()));
        self.by_title.clear();
        for (i, chart) in self.charts.iter().enumerate() {
            self.by_title.insert(chart.title().to_string(), i);
        }
    }

    fn apply_colors(&mut self, update: &HistoryUpdate, series_key: &str) {
        for (title, _) in &update.metrics {
            if !self.color_of_title.contains_key(title) {
                let color = self.palette.color(self.next_color);
                self.next_color += 1;
                self.color_of_title.insert(title.clone(), color);
            }
            let color = match self.color_mode {
                SeriesColorMode::PerPlot => self.color_of_title[title],
                SeriesColorMode::PerSeries => {
                    let next = self.color_of_series.len();
                    *self
                        .color_of_series
                        .entry(series_key.to_string())
                        .or_insert_with(|| self.palette.color(next))
                }
            };
            if let Some(&idx) = self.by_title.get(title)
                && let Some(series) = self.charts[idx].series(series_key)
            {
                series.set_color(color);
            }
        }
    }

    /// Stable accent color for a chart title, if assigned.
    pub fn color_of_title(&self, title: &str) -> Option<Color> {
        self.color_of_title.get(title).copied()
    }

    /// Remove `series_key` from every chart; charts left empty are dropped.
    pub fn remove_series_everywhere(&mut self, series_key: &str) {
        let mut removed_titles = Vec::new();
        for chart in &mut self.charts {
            chart.remove_series(series_key);
            if !chart.has_series() {
                removed_titles.push(chart.title().to_string());
            }
        }
        if !removed_titles.is_empty() {
            self.charts.retain(|c| c.has_series());
            self.resort();
        }
        self.refresh_filtered();
        self.load_page();
    }

    /// Move `series_key` to the top of the draw order in every chart.
    pub fn promote_series_everywhere(&mut self, series_key: &str) {
        for chart in &mut self.charts {
            chart.promote_series_to_top(series_key);
        }
    }

    // ---------------------------------------------------------------------
    // Filter
    // ---------------------------------------------------------------------

    pub fn enter_filter_mode(&mut self) {
        self.filter.enter_edit();
    }

    /// Live preview while the user types. An emptied draft also drops focus,
    /// since the focused chart may no longer be on the page.
    pub fn set_filter_draft(&mut self, draft: &str) {
        self.filter.set_draft(draft);
        if draft.is_empty() {
            self.clear_focus();
        }
        self.refresh_filtered();
        self.nav.reset();
        self.load_page();
    }

    pub fn exit_filter_mode(&mut self, confirm: bool) {
        self.filter.exit_edit(confirm);
        self.refresh_filtered();
        self.nav.reset();
        self.load_page();
    }

    pub fn apply_filter(&mut self, query: &str) {
        self.filter.set_draft(query);
        self.filter.exit_edit(true);
        self.refresh_filtered();
        self.nav.reset();
        self.load_page();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refresh_filtered();
        self.nav.reset();
        self.load_page();
    }

    /// Flip regex/glob matching and re-filter under the new mode.
    pub fn toggle_filter_mode(&mut self) {
        self.filter.toggle_mode();
        self.refresh_filtered();
        self.nav.reset();
        self.load_page();
    }

    fn refresh_filtered(&mut self) {
        let matcher = self.filter.matcher();
        self.filtered = (0..self.charts.len())
            .filter(|&i| matcher.matches(self.charts[i].title()))
            .collect();
    }

    /// Titles passing the filter, in display order.
    pub fn visible_titles(&self) -> Vec<&str> {
        self.filtered
            .iter()
            .map(|&i| self.charts[i].title())
            .collect()
    }

    // ---------------------------------------------------------------------
    // Pagination and layout
    // ---------------------------------------------------------------------

    fn effective_dims(&self) -> (u16, u16) {
        effective_grid_size(
            self.cfg_rows,
            self.cfg_cols,
            self.viewport.w,
            self.viewport.h,
            MIN_CELL_W,
            MIN_CELL_H,
            HEADER_LINES,
        )
    }

    pub fn navigate(&mut self, delta: isize) {
        let (rows, cols) = self.effective_dims();
        self.nav
            .set_counts(self.filtered.len(), rows as usize * cols as usize);
        self.nav.navigate(delta);
        self.clear_focus();
        self.load_page();
    }

    /// Rebuild the current page: recompute effective dims, park charts that
    /// left visibility, size the visible ones, and restore focus by title.
    fn load_page(&mut self) {
        let (rows, cols) = self.effective_dims();
        let ipp = rows as usize * cols as usize;
        self.nav.set_counts(self.filtered.len(), ipp);
        let (start, end) = self.nav.page_range(self.filtered.len(), ipp);
        let page: Vec<usize> = self.filtered[start..end].to_vec();

        // A short last page only allocates the rows it occupies.
        let (used_rows, _) = compute_grid_dims(page.len(), rows, cols);
        self.page_cells = vec![vec![None; cols as usize]; used_rows as usize];
        for (slot, &chart_idx) in page.iter().enumerate() {
            let r = slot / cols as usize;
            let c = slot % cols as usize;
            self.page_cells[r][c] = Some(chart_idx);
        }

        // Park whatever just left the page.
        let now_visible: HashSet<String> = page
            .iter()
            .map(|&i| self.charts[i].title().to_string())
            .collect();
        for title in self.last_drawn.difference(&now_visible) {
            if let Some(&idx) = self.by_title.get(title) {
                debug!(target: "grid.metrics", title = title.as_str(), "chart_parked");
                self.charts[idx].park();
            }
        }
        self.last_drawn = now_visible;

        // Size visible charts to their cells.
        let (cell_w, cell_h) = self.cell_size(rows, cols);
        let inner_w = cell_w.saturating_sub(2);
        let inner_h = cell_h.saturating_sub(2);
        for &idx in &page {
            self.charts[idx].resize(inner_w, inner_h);
        }

        // Restore focus to the cell holding the remembered title.
        self.focus = None;
        if let Some(title) = self.focus_title.clone() {
            for (r, row) in self.page_cells.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if let Some(idx) = cell
                        && self.charts[*idx].title() == title
                    {
                        self.focus = Some((r, c));
                    }
                }
            }
            if self.focus.is_none() {
                self.focus_title = None;
            }
        }
        self.sync_focus_flags();
    }

    fn cell_size(&self, rows: u16, cols: u16) -> (u16, u16) {
        let w = if cols == 0 { 0 } else { self.viewport.w / cols };
        let h = if rows == 0 {
            0
        } else {
            self.viewport.h.saturating_sub(HEADER_LINES) / rows
        };
        (w, h)
    }

    fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let (rows, cols) = self.effective_dims();
        let (cell_w, cell_h) = self.cell_size(rows, cols);
        Rect::new(
            self.viewport.x + col as u16 * cell_w,
            self.viewport.y + HEADER_LINES + row as u16 * cell_h,
            cell_w,
            cell_h,
        )
    }

    fn visible_indices(&self) -> Vec<usize> {
        self.page_cells
            .iter()
            .flatten()
            .filter_map(|c| *c)
            .collect()
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// Left click toggles focus on a cell.
    pub fn toggle_focus(&mut self, row: usize, col: usize) {
        let target = self
            .page_cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .flatten();
        let Some(idx) = target else {
            return;
        };
        if self.focus == Some((row, col)) {
            self.clear_focus();
        } else {
            self.focus = Some((row, col));
            self.focus_title = Some(self.charts[idx].title().to_string());
        }
        self.sync_focus_flags();
    }

    fn clear_focus(&mut self) {
        self.focus = None;
        self.focus_title = None;
        self.sync_focus_flags();
    }

    fn sync_focus_flags(&mut self) {
        let focused_idx = self
            .focus
            .and_then(|(r, c)| self.page_cells.get(r).and_then(|row| row.get(c)).copied())
            .flatten();
        for (i, chart) in self.charts.iter_mut().enumerate() {
            chart.set_focused(Some(i) == focused_idx);
        }
    }

    // ---------------------------------------------------------------------
    // Mouse routing
    // ---------------------------------------------------------------------

    /// Map a screen position to the cell under it.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let (rows, cols) = self.effective_dims();
        for r in 0..rows as usize {
            for c in 0..cols as usize {
                if self.cell_rect(r, c).contains(x, y) {
                    return Some((r, c));
                }
            }
        }
        None
    }

    /// Route a mouse event. Returns true when the grid consumed it.
    pub fn handle_mouse(&mut self, msg: &MouseMsg) -> bool {
        match msg.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((r, c)) = self.hit_test(msg.x, msg.y) else {
                    return false;
                };
                self.toggle_focus(r, c);
                true
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let direction = if msg.kind == MouseEventKind::ScrollUp {
                    ZoomDirection::In
                } else {
                    ZoomDirection::Out
                };
                let Some((r, c)) = self.hit_test(msg.x, msg.y) else {
                    return false;
                };
                let Some(px) = self.graph_px(r, c, msg.x) else {
                    return false;
                };
                if let Some(idx) = self.cell_chart(r, c) {
                    self.charts[idx].handle_zoom(direction, px);
                }
                true
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let Some((r, c)) = self.hit_test(msg.x, msg.y) else {
                    return false;
                };
                let Some(px) = self.graph_px(r, c, msg.x) else {
                    return false;
                };
                let Some(idx) = self.cell_chart(r, c) else {
                    return false;
                };
                self.charts[idx].start_inspection(px);
                if msg.alt_held() {
                    self.sync_inspect = true;
                    self.broadcast_inspection(idx);
                }
                true
            }
            MouseEventKind::Drag(MouseButton::Right) => {
                let Some((r, c)) = self.hit_test(msg.x, msg.y) else {
                    return false;
                };
                let Some(px) = self.graph_px(r, c, msg.x) else {
                    return false;
                };
                let Some(idx) = self.cell_chart(r, c) else {
                    return false;
                };
                self.charts[idx].update_inspection(px);
                if self.sync_inspect {
                    self.broadcast_inspection(idx);
                }
                true
            }
            MouseEventKind::Up(MouseButton::Right) => {
                if self.sync_inspect {
                    self.sync_inspect = false;
                    for idx in self.visible_indices() {
                        self.charts[idx].end_inspection();
                    }
                } else if let Some((r, c)) = self.hit_test(msg.x, msg.y)
                    && let Some(idx) = self.cell_chart(r, c)
                {
                    self.charts[idx].end_inspection();
                } else {
                    // Release outside any cell still ends every inspection;
                    // a stuck crosshair is worse than a spurious clear.
                    for idx in self.visible_indices() {
                        self.charts[idx].end_inspection();
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn cell_chart(&self, row: usize, col: usize) -> Option<usize> {
        self.page_cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .flatten()
    }

    /// Convert a screen X into a graph pixel for the chart in (row, col),
    /// accounting for the border and the chart's Y-label gutter.
    fn graph_px(&self, row: usize, col: usize, screen_x: u16) -> Option<u32> {
        let idx = self.cell_chart(row, col)?;
        let inner = self.cell_rect(row, col).inner();
        let chart = &self.charts[idx];
        let graph_start = inner.x.checked_add(chart.graph_left())?;
        if screen_x < graph_start {
            return None;
        }
        Some((screen_x - graph_start) as u32 * 2)
    }

    /// Broadcast the anchor data-X of `source_idx` to every visible chart.
    fn broadcast_inspection(&mut self, source_idx: usize) {
        let Some(anchor) = self.charts[source_idx].inspection().map(|i| i.data_x) else {
            return;
        };
        for idx in self.visible_indices() {
            if idx != source_idx {
                self.charts[idx].inspect_at_data_x(anchor);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Render
    // ---------------------------------------------------------------------

    /// Header text of the form `[a-b of n]`, empty when there are no charts.
    pub fn header_text(&self) -> String {
        let (rows, cols) = self.effective_dims();
        let ipp = rows as usize * cols as usize;
        let total = self.filtered.len();
        if total == 0 {
            return String::new();
        }
        let (start, end) = self.nav.page_range(total, ipp);
        format!("[{}-{} of {}]", start + 1, end, total)
    }

    /// Redraw dirty visible charts and compose the grid into `surface`.
    pub fn render(&mut self, surface: &mut Surface) {
        for idx in self.visible_indices() {
            if self.charts[idx].is_dirty() {
                self.charts[idx].draw();
            }
        }

        // Header row: filter state left, page indicator right.
        let header_y = self.viewport.y;
        let mut left = String::new();
        if self.filter.editing() {
            left = format!("filter ({}): {}_", self.filter.mode().as_str(), self.filter.draft());
        } else if self.filter.is_active() {
            left = format!("filter ({}): {}", self.filter.mode().as_str(), self.filter.applied());
        }
        draw_text(
            surface,
            self.viewport.x,
            header_y,
            &left,
            Style::dim(),
            self.viewport.w,
        );
        let header = self.header_text();
        if !header.is_empty() {
            let x = self
                .viewport
                .x
                .saturating_add(self.viewport.w.saturating_sub(header.len() as u16));
            draw_text(surface, x, header_y, &header, Style::dim(), self.viewport.w);
        }

        for (r, row) in self.page_cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(idx) = cell else { continue };
                let rect = self.cell_rect(r, c);
                let chart = &self.charts[*idx];
                let accent = self
                    .color_of_title
                    .get(chart.title())
                    .copied()
                    .unwrap_or(Color::Reset);
                let border_style = if chart.focused() {
                    Style::bold(accent)
                } else {
                    Style::dim()
                };
                let title = text::clip_label(chart.title(), rect.w.saturating_sub(4));
                text::draw_border(surface, rect, border_style, Some(&title));
                let inner = rect.inner();
                surface.blit(chart.canvas(), inner.x, inner.y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::MetricPoints;

    fn update(entries: &[(&str, &[f64], &[f64])]) -> HistoryUpdate {
        HistoryUpdate {
            metrics: entries
                .iter()
                .map(|(name, xs, ys)| {
                    (
                        name.to_string(),
                        MetricPoints {
                            xs: xs.to_vec(),
                            ys: ys.to_vec(),
                        },
                    )
                })
                .collect(),
        }
    }

    fn grid_1x2() -> MetricsGrid {
        let mut g = MetricsGrid::new(1, 2, ColorScheme::Default, SeriesColorMode::PerPlot);
        g.set_viewport(Rect::new(0, 0, 200, 20));
        g
    }

    #[test]
    fn charts_stay_sorted_and_indexed() {
        let mut g = grid_1x2();
        g.process_history(&update(&[("zeta", &[0.0], &[1.0])]), "Default");
        g.process_history(&update(&[("alpha", &[0.0], &[1.0])]), "Default");
        g.process_history(&update(&[("beta", &[0.0], &[1.0])]), "Default");
        let titles: Vec<&str> = g.titles().collect();
        assert_eq!(titles, ["alpha", "beta", "zeta"]);
        for title in ["alpha", "beta", "zeta"] {
            assert_eq!(g.chart_by_title(title).unwrap().title(), title);
        }
    }

    #[test]
    fn pagination_header_and_navigation() {
        let mut g = grid_1x2();
        g.process_history(
            &update(&[
                ("alpha", &[0.0], &[1.0]),
                ("beta", &[0.0], &[1.0]),
                ("zeta", &[0.0], &[1.0]),
            ]),
            "Default",
        );
        assert_eq!(g.header_text(), "[1-2 of 3]");
        let mut surface = Surface::new(200, 20);
        g.render(&mut surface);

        g.navigate(1);
        assert_eq!(g.header_text(), "[3-3 of 3]");
        let page_titles: Vec<&str> = g
            .visible_titles()
            .into_iter()
            .skip(g.current_page() * 2)
            .collect();
        assert_eq!(page_titles, ["zeta"]);
    }

    #[test]
    fn filter_persists_across_ingest() {
        let mut g = grid_1x2();
        g.process_history(
            &update(&[("train/loss", &[0.0], &[1.0]), ("accuracy", &[0.0], &[1.0])]),
            "Default",
        );
        g.apply_filter("loss");
        assert_eq!(g.visible_titles(), ["train/loss"]);

        g.process_history(
            &update(&[("val/loss", &[0.0], &[1.0]), ("val/accuracy", &[0.0], &[1.0])]),
            "Default",
        );
        assert_eq!(g.visible_titles(), ["train/loss", "val/loss"]);
        assert_eq!(g.len(), 4, "filter hides, never drops");
    }

    #[test]
    fn focus_survives_resort() {
        let mut g = grid_1x2();
        g.process_history(
            &update(&[("alpha", &[0.0], &[1.0]), ("beta", &[0.0], &[1.0])]),
            "Default",
        );
        g.toggle_focus(0, 0);
        assert_eq!(g.focused_title(), Some("alpha"));

        // "gamma" sorts between the two; alpha must stay focused.
        g.process_history(&update(&[("gamma", &[0.0], &[1.0])]), "Default");
        assert_eq!(g.focused_title(), Some("alpha"));
        let (r, c) = g.focus().expect("focus retained");
        assert_eq!((r, c), (0, 0));
    }

    #[test]
    fn navigation_clears_focus() {
        let mut g = grid_1x2();
        g.process_history(
            &update(&[
                ("a", &[0.0], &[1.0]),
                ("b", &[0.0], &[1.0]),
                ("c", &[0.0], &[1.0]),
            ]),
            "Default",
        );
        g.toggle_focus(0, 1);
        assert!(g.focus().is_some());
        g.navigate(1);
        assert!(g.focus().is_none());
    }

    #[test]
    fn offscreen_charts_are_parked() {
        let mut g = grid_1x2();
        g.process_history(
            &update(&[
                ("a", &[0.0], &[1.0]),
                ("b", &[0.0], &[1.0]),
                ("c", &[0.0], &[1.0]),
            ]),
            "Default",
        );
        let on_page_w = g.chart_by_title("a").unwrap().canvas().width();
        assert!(on_page_w > 1);
        g.navigate(1);
        assert_eq!(g.chart_by_title("a").unwrap().canvas().width(), 1);
        assert!(g.chart_by_title("c").unwrap().canvas().width() > 1);
    }

    #[test]
    fn per_series_mode_colors_runs_consistently() {
        let mut g = MetricsGrid::new(1, 2, ColorScheme::Default, SeriesColorMode::PerSeries);
        g.set_viewport(Rect::new(0, 0, 200, 20));
        g.process_history(&update(&[("loss", &[0.0], &[1.0])]), "run-a");
        g.process_history(&update(&[("acc", &[0.0], &[1.0])]), "run-a");
        let c1 = g
            .chart_by_title("loss")
            .unwrap()
            .series("run-a")
            .unwrap()
            .color();
        let c2 = g
            .chart_by_title("acc")
            .unwrap()
            .series("run-a")
            .unwrap()
            .color();
        assert_eq!(c1, c2, "one run, one color, every chart");
    }

    #[test]
    fn ingest_twice_is_idempotent_for_bounds() {
        let mut g = grid_1x2();
        let batch = update(&[("loss", &[0.0, 1.0], &[0.5, 1.5])]);
        g.process_history(&batch, "Default");
        let before = g.chart_by_title("loss").unwrap().bounds();
        g.process_history(&batch, "Default");
        let after = g.chart_by_title("loss").unwrap().bounds();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_series_drops_empty_charts() {
        let mut g = grid_1x2();
        g.process_history(&update(&[("loss", &[0.0], &[1.0])]), "run-a");
        g.process_history(&update(&[("loss", &[0.0], &[2.0])]), "run-b");
        g.remove_series_everywhere("run-a");
        assert_eq!(g.len(), 1);
        g.remove_series_everywhere("run-b");
        assert_eq!(g.len(), 0);
    }
}
