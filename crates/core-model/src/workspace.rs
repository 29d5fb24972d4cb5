//! Multi-run workspace: selection, pinning, and per-run streaming into one
//! shared metrics grid.
//!
//! Every selected run streams independently (own reader task, own watcher)
//! but lands in the same `MetricsGrid`, with the run key as the series key:
//! one color per run across every chart. A single shared heartbeat is armed
//! while *any* selected run is running; a tick drains all of them, a
//! filesystem change drains just the run that changed.
//!
//! Selection invariant: a run is never left "selected but never loads". A
//! failed open reverts both the selection and any pin it acquired.

use crate::animation::AnimationState;
use crate::msg::{Msg, RunListing};
use crate::overview::RunOverview;
use crate::run::{RunState, UpdateOutcome, schedule_frame};
use crate::stream::RunStream;
use core_config::{ColorMode, Config};
use core_events::{
    KeyCode, KeyMsg, MouseEventKind, MouseMsg, RecordMsg, RunKey, WindowSizeMsg,
};
use core_grid::{MetricsGrid, SeriesColorMode, SystemColorMode, SystemMetricsGrid};
use core_keymap::{Action, GridConfigTarget, KeyRegistry, capture_digit};
use core_render::text::{clip_label, draw_border, draw_text};
use core_render::{Color, Rect, Style, Surface};
use core_watch::HeartbeatManager;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

const ANIMATION_DURATION: Duration = Duration::from_millis(200);
const STATUS_ROWS: u16 = 1;

struct WorkspaceRun {
    path: PathBuf,
    state: RunState,
    stream: Option<RunStream>,
    backfill_done: bool,
}

pub struct Workspace {
    dir: PathBuf,
    /// Listing order, newest first.
    order: Vec<RunKey>,
    runs: HashMap<RunKey, WorkspaceRun>,
    /// Selection in toggle order; the first entry is the auto-pin fallback.
    selected: Vec<RunKey>,
    pinned: Option<RunKey>,

    metrics: MetricsGrid,
    system: SystemMetricsGrid,
    overviews: HashMap<RunKey, RunOverview>,

    heartbeat: HeartbeatManager<Msg>,
    running_count: Arc<AtomicUsize>,

    list_cursor: usize,
    keymap: KeyRegistry,
    pending_grid_config: Option<GridConfigTarget>,

    left_anim: AnimationState,
    right_anim: AnimationState,
    left_ticking: bool,
    right_ticking: bool,

    tx: mpsc::Sender<Msg>,
    window: (u16, u16),
    initialized: bool,

    config: Config,
    config_path: Option<PathBuf>,
}

impl Workspace {
    pub fn new(
        dir: PathBuf,
        tx: mpsc::Sender<Msg>,
        config: Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        let running_count = Arc::new(AtomicUsize::new(0));
        let predicate_count = running_count.clone();
        let heartbeat = HeartbeatManager::new(
            Duration::from_secs(config.heartbeat_interval_seconds),
            tx.clone(),
            Msg::Heartbeat,
            move || predicate_count.load(Ordering::SeqCst) > 0,
        );

        let metrics = MetricsGrid::new(
            config.metrics_grid.rows,
            config.metrics_grid.cols,
            config.color_scheme,
            // Multi-run charts always color by series so one run keeps one
            // color across every chart.
            SeriesColorMode::PerSeries,
        );
        let system = SystemMetricsGrid::new(
            config.system_grid.rows,
            config.system_grid.cols,
            config.system_color_scheme,
            match config.system_color_mode {
                ColorMode::PerPlot => SystemColorMode::PerPlot,
                ColorMode::PerSeries => SystemColorMode::PerSeries,
            },
        );

        Self {
            dir,
            order: Vec::new(),
            runs: HashMap::new(),
            selected: Vec::new(),
            pinned: None,
            metrics,
            system,
            overviews: HashMap::new(),
            heartbeat,
            running_count,
            list_cursor: 0,
            keymap: KeyRegistry::default(),
            pending_grid_config: None,
            left_anim: AnimationState::new(32, ANIMATION_DURATION, config.left_sidebar_visible),
            right_anim: AnimationState::new(42, ANIMATION_DURATION, config.right_sidebar_visible),
            left_ticking: false,
            right_ticking: false,
            tx,
            window: (0, 0),
            initialized: false,
            config,
            config_path,
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn selected(&self) -> &[RunKey] {
        &self.selected
    }

    pub fn pinned(&self) -> Option<&RunKey> {
        self.pinned.as_ref()
    }

    pub fn metrics(&self) -> &MetricsGrid {
        &self.metrics
    }

    pub fn run_state(&self, key: &str) -> Option<RunState> {
        self.runs.get(key).map(|r| r.state)
    }

    // ---------------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------------

    pub fn update(&mut self, msg: Msg) -> UpdateOutcome {
        match msg {
            Msg::RunDirs { entries } => {
                self.apply_run_dirs(entries);
                UpdateOutcome::dirty()
            }
            Msg::ReaderOpened { run_key, result } => {
                self.apply_reader_opened(run_key, result);
                UpdateOutcome::dirty()
            }
            Msg::Chunked { run_key, batch } => {
                let mut outcome = self.apply_records(&run_key, batch.msgs);
                let mut backfill_finished = false;
                if let Some(run) = self.runs.get_mut(&run_key) {
                    if batch.has_more && !run.state.is_terminal() {
                        if let Some(stream) = &run.stream {
                            stream.request_chunk();
                        }
                    } else if !run.backfill_done {
                        run.backfill_done = true;
                        backfill_finished = true;
                    }
                }
                if backfill_finished {
                    self.enter_live_mode(&run_key);
                }
                outcome.dirty = true;
                outcome
            }
            Msg::Batched { run_key, batch } => self.apply_records(&run_key, batch.msgs),
            Msg::Heartbeat => {
                let mut any_running = false;
                for key in &self.selected {
                    if let Some(run) = self.runs.get(key)
                        && run.state == RunState::Running
                        && run.backfill_done
                    {
                        any_running = true;
                        if let Some(stream) = &run.stream {
                            stream.request_drain();
                        }
                    }
                }
                if any_running {
                    self.heartbeat.reset();
                }
                UpdateOutcome::default()
            }
            Msg::FileChanged { run_key } => {
                if let Some(run) = self.runs.get(&run_key)
                    && run.state == RunState::Running
                    && let Some(stream) = &run.stream
                {
                    stream.request_drain();
                    self.heartbeat.reset();
                }
                UpdateOutcome::default()
            }
            Msg::Key(key) => self.handle_key(key),
            Msg::Mouse(mouse) => self.handle_mouse(mouse),
            Msg::WindowSize(WindowSizeMsg { width, height }) => {
                self.window = (width, height);
                self.left_anim.set_expanded_width((width / 4).clamp(24, 40));
                self.right_anim.set_expanded_width((width / 3).clamp(28, 56));
                self.relayout();
                UpdateOutcome::dirty()
            }
            Msg::LeftSidebarAnimation => {
                if self.left_anim.update(Instant::now()) {
                    self.left_ticking = false;
                } else {
                    schedule_frame(self.tx.clone(), Msg::LeftSidebarAnimation);
                }
                self.relayout();
                UpdateOutcome::dirty()
            }
            Msg::RightSidebarAnimation => {
                if self.right_anim.update(Instant::now()) {
                    self.right_ticking = false;
                } else {
                    schedule_frame(self.tx.clone(), Msg::RightSidebarAnimation);
                }
                self.relayout();
                UpdateOutcome::dirty()
            }
        }
    }

    // ---------------------------------------------------------------------
    // Run listing and selection
    // ---------------------------------------------------------------------

    fn apply_run_dirs(&mut self, mut entries: Vec<RunListing>) {
        entries.sort_by(|a, b| b.modified.cmp(&a.modified));
        self.order = entries.iter().map(|e| e.key.clone()).collect();
        for entry in entries {
            self.runs.entry(entry.key.clone()).or_insert(WorkspaceRun {
                path: entry.path,
                state: RunState::Loading,
                stream: None,
                backfill_done: false,
            });
        }
        if self.list_cursor >= self.order.len() {
            self.list_cursor = self.order.len().saturating_sub(1);
        }

        // First listing: auto-select and auto-pin the latest run.
        if !self.initialized
            && let Some(latest) = self.order.first().cloned()
        {
            self.initialized = true;
            info!(target: "model.workspace", run = latest.as_str(), "auto_select_latest");
            self.selected.push(latest.clone());
            self.pinned = Some(latest.clone());
            self.begin_open(&latest);
        }
    }

    /// Validate the run log off-loop before streaming it. The result comes
    /// back as `Msg::ReaderOpened`.
    fn begin_open(&self, key: &RunKey) {
        let Some(run) = self.runs.get(key) else {
            return;
        };
        let path = run.path.clone();
        let key = key.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let probe = path.clone();
            let result = tokio::task::spawn_blocking(move || {
                std::fs::metadata(&probe)
                    .map_err(|e| e.to_string())
                    .and_then(|m| {
                        if m.is_file() {
                            Ok(())
                        } else {
                            Err("not a regular file".to_string())
                        }
                    })
            })
            .await
            .unwrap_or_else(|join_err| Err(join_err.to_string()));
            let _ = tx.send(Msg::ReaderOpened { run_key: key, result }).await;
        });
    }

    fn apply_reader_opened(&mut self, key: RunKey, result: Result<(), String>) {
        match result {
            Ok(()) => {
                if !self.selected.contains(&key) {
                    // Deselected while the open was in flight.
                    return;
                }
                if let Some(run) = self.runs.get_mut(&key)
                    && run.stream.is_none()
                {
                    let stream = RunStream::spawn(key.clone(), run.path.clone(), self.tx.clone());
                    stream.request_chunk();
                    run.stream = Some(stream);
                }
            }
            Err(e) => {
                warn!(
                    target: "model.workspace",
                    run = key.as_str(),
                    error = e.as_str(),
                    "reader_open_failed"
                );
                self.revert_selection(&key);
            }
        }
    }

    /// A run must never stay selected if its reader cannot start.
    fn revert_selection(&mut self, key: &RunKey) {
        self.selected.retain(|k| k != key);
        if self.pinned.as_ref() == Some(key) {
            self.pinned = self.selected.first().cloned();
        }
    }

    /// Toggle selection of `key`.
    pub fn toggle_selection(&mut self, key: &RunKey) {
        if self.selected.contains(key) {
            self.deselect(key);
        } else {
            self.selected.push(key.clone());
            if self.pinned.is_none() {
                self.pinned = Some(key.clone());
            }
            self.begin_open(key);
        }
    }

    fn deselect(&mut self, key: &RunKey) {
        self.selected.retain(|k| k != key);
        if let Some(run) = self.runs.get_mut(key) {
            if run.state == RunState::Running {
                self.running_count.fetch_sub(1, Ordering::SeqCst);
            }
            // Dropping the stream closes the reader task and watcher.
            run.stream = None;
            run.backfill_done = false;
            run.state = RunState::Loading;
        }
        self.metrics.remove_series_everywhere(key);
        self.overviews.remove(key);
        if self.pinned.as_ref() == Some(key) {
            self.pinned = self.selected.first().cloned();
        }
        self.sync_heartbeat();
        info!(target: "model.workspace", run = key.as_str(), "run_deselected");
    }

    /// Pin `key`; pinning a deselected run selects it first.
    pub fn pin(&mut self, key: &RunKey) {
        if !self.selected.contains(key) {
            self.toggle_selection(key);
        }
        self.pinned = Some(key.clone());
        self.metrics.promote_series_everywhere(key);
    }

    // ---------------------------------------------------------------------
    // Record application
    // ---------------------------------------------------------------------

    fn apply_records(&mut self, key: &RunKey, msgs: Vec<RecordMsg>) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        for msg in msgs {
            match msg {
                RecordMsg::Run(run_info) => {
                    self.overviews
                        .entry(key.clone())
                        .or_default()
                        .apply_run_info(&run_info);
                    self.set_run_state(key, RunState::Running);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::History(update) => {
                    self.metrics.process_history(&update, key);
                    if let Some(pinned) = self.pinned.clone() {
                        self.metrics.promote_series_everywhere(&pinned);
                    }
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::Stats(update) => {
                    // Telemetry panel follows the pinned run.
                    if self.pinned.as_ref() == Some(key) {
                        self.system.process_stats(&update);
                        outcome.absorb(UpdateOutcome::dirty());
                    }
                }
                RecordMsg::SystemInfo(sysinfo) => {
                    self.overviews
                        .entry(key.clone())
                        .or_default()
                        .apply_system_info(&sysinfo);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::Summary(summary) => {
                    self.overviews
                        .entry(key.clone())
                        .or_default()
                        .apply_summary(&summary);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::FileComplete { exit_code } => {
                    let next = if exit_code == 0 {
                        RunState::Finished
                    } else {
                        RunState::Failed
                    };
                    self.set_run_state(key, next);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::Error(err) => {
                    warn!(
                        target: "model.workspace",
                        run = key.as_str(),
                        error = err.as_str(),
                        "run_stream_error"
                    );
                    self.set_run_state(key, RunState::Failed);
                    outcome.absorb(UpdateOutcome::dirty());
                }
            }
        }
        outcome
    }

    fn set_run_state(&mut self, key: &RunKey, next: RunState) {
        let Some(run) = self.runs.get_mut(key) else {
            return;
        };
        if run.state == next {
            return;
        }
        let was_running = run.state == RunState::Running;
        run.state = next;
        info!(
            target: "model.workspace",
            run = key.as_str(),
            state = next.as_str(),
            "run_state"
        );
        if next == RunState::Running && !was_running {
            self.running_count.fetch_add(1, Ordering::SeqCst);
        } else if was_running {
            self.running_count.fetch_sub(1, Ordering::SeqCst);
        }
        if next.is_terminal()
            && let Some(stream) = &mut run.stream
        {
            stream.stop_watcher();
        }
        self.sync_heartbeat();
    }

    fn enter_live_mode(&mut self, key: &RunKey) {
        let tx = self.tx.clone();
        let Some(run) = self.runs.get_mut(key) else {
            return;
        };
        if run.state != RunState::Running {
            return;
        }
        if let Some(stream) = &mut run.stream
            && !stream.watcher_running()
            && let Err(e) = stream.start_watcher(tx)
        {
            warn!(
                target: "model.workspace",
                run = key.as_str(),
                error = %e,
                "watcher_start_failed"
            );
        }
        self.sync_heartbeat();
    }

    /// The shared heartbeat runs while any selected run is running.
    fn sync_heartbeat(&self) {
        if self.running_count.load(Ordering::SeqCst) > 0 {
            self.heartbeat.start();
        } else {
            self.heartbeat.stop();
        }
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyMsg) -> UpdateOutcome {
        if self.metrics.filter.editing() {
            return self.handle_filter_key(key);
        }
        if let Some(target) = self.pending_grid_config {
            return self.handle_grid_config_key(target, key);
        }
        let Some(action) = self.keymap.resolve(&key) else {
            return UpdateOutcome::default();
        };
        match action {
            Action::Quit => UpdateOutcome {
                quit: true,
                dirty: false,
            },
            Action::NavigateUp => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
                UpdateOutcome::dirty()
            }
            Action::NavigateDown => {
                if self.list_cursor + 1 < self.order.len() {
                    self.list_cursor += 1;
                }
                UpdateOutcome::dirty()
            }
            Action::Select => {
                if let Some(key) = self.order.get(self.list_cursor).cloned() {
                    self.toggle_selection(&key);
                }
                UpdateOutcome::dirty()
            }
            Action::TogglePin => {
                if let Some(key) = self.order.get(self.list_cursor).cloned() {
                    self.pin(&key);
                }
                UpdateOutcome::dirty()
            }
            Action::NextPage => {
                self.metrics.navigate(1);
                UpdateOutcome::dirty()
            }
            Action::PrevPage => {
                self.metrics.navigate(-1);
                UpdateOutcome::dirty()
            }
            Action::EnterFilter => {
                self.metrics.enter_filter_mode();
                UpdateOutcome::dirty()
            }
            Action::ClearFilter => {
                self.metrics.clear_filter();
                UpdateOutcome::dirty()
            }
            Action::ToggleFilterMode => {
                self.metrics.toggle_filter_mode();
                UpdateOutcome::dirty()
            }
            Action::BeginGridConfig(target) => {
                self.pending_grid_config = Some(target);
                UpdateOutcome::dirty()
            }
            Action::CycleOverviewSection => {
                if let Some(pinned) = self.pinned.clone()
                    && let Some(overview) = self.overviews.get_mut(&pinned)
                {
                    overview.cycle_section();
                }
                UpdateOutcome::dirty()
            }
            Action::ToggleLeftSidebar => {
                self.toggle_sidebar(true);
                UpdateOutcome::dirty()
            }
            Action::ToggleRightSidebar => {
                self.toggle_sidebar(false);
                UpdateOutcome::dirty()
            }
        }
    }

    fn handle_filter_key(&mut self, key: KeyMsg) -> UpdateOutcome {
        match key.code {
            KeyCode::Enter => self.metrics.exit_filter_mode(true),
            KeyCode::Esc => self.metrics.exit_filter_mode(false),
            KeyCode::Backspace => {
                let mut draft = self.metrics.filter.draft().to_string();
                draft.pop();
                self.metrics.set_filter_draft(&draft);
            }
            KeyCode::Char(c) if !key.mods.intersects(core_events::KeyModifiers::CTRL) => {
                let mut draft = self.metrics.filter.draft().to_string();
                draft.push(c);
                self.metrics.set_filter_draft(&draft);
            }
            _ => return UpdateOutcome::default(),
        }
        UpdateOutcome::dirty()
    }

    fn handle_grid_config_key(&mut self, target: GridConfigTarget, key: KeyMsg) -> UpdateOutcome {
        if key.code == KeyCode::Esc {
            self.pending_grid_config = None;
            return UpdateOutcome::dirty();
        }
        let Some(value) = capture_digit(&key) else {
            return UpdateOutcome::default();
        };
        self.pending_grid_config = None;
        let (mrows, mcols) = self.metrics.grid_config();
        let (srows, scols) = self.system.grid_config();
        match target {
            GridConfigTarget::MetricsRows => self.metrics.set_grid_config(value, mcols),
            GridConfigTarget::MetricsCols => self.metrics.set_grid_config(mrows, value),
            GridConfigTarget::SystemRows => self.system.set_grid_config(value, scols),
            GridConfigTarget::SystemCols => self.system.set_grid_config(srows, value),
        }
        let (mrows, mcols) = self.metrics.grid_config();
        let (srows, scols) = self.system.grid_config();
        self.config.metrics_grid = core_config::GridDims {
            rows: mrows,
            cols: mcols,
        };
        self.config.system_grid = core_config::GridDims {
            rows: srows,
            cols: scols,
        };
        if let Some(path) = &self.config_path
            && let Err(e) = core_config::save_to(path, &self.config)
        {
            warn!(target: "model.workspace", error = %e, "config_save_failed");
        }
        UpdateOutcome::dirty()
    }

    fn toggle_sidebar(&mut self, left: bool) {
        let (anim, ticking, msg) = if left {
            (
                &mut self.left_anim,
                &mut self.left_ticking,
                Msg::LeftSidebarAnimation,
            )
        } else {
            (
                &mut self.right_anim,
                &mut self.right_ticking,
                Msg::RightSidebarAnimation,
            )
        };
        if *ticking {
            return;
        }
        anim.toggle(Instant::now());
        *ticking = true;
        schedule_frame(self.tx.clone(), msg);
    }

    fn handle_mouse(&mut self, mouse: MouseMsg) -> UpdateOutcome {
        let layout = self.layout();
        if layout.main.contains(mouse.x, mouse.y) || self.metrics.sync_inspect_active() {
            if self.metrics.handle_mouse(&mouse) {
                return UpdateOutcome::dirty();
            }
            return UpdateOutcome::default();
        }
        if layout.left.contains(mouse.x, mouse.y) {
            match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.list_cursor = self.list_cursor.saturating_sub(1);
                    return UpdateOutcome::dirty();
                }
                MouseEventKind::ScrollDown => {
                    if self.list_cursor + 1 < self.order.len() {
                        self.list_cursor += 1;
                    }
                    return UpdateOutcome::dirty();
                }
                _ => return UpdateOutcome::default(),
            }
        }
        UpdateOutcome::default()
    }

    // ---------------------------------------------------------------------
    // Layout and render
    // ---------------------------------------------------------------------

    fn layout(&self) -> WorkspaceLayout {
        let (w, h) = self.window;
        let body_h = h.saturating_sub(STATUS_ROWS);
        let left_w = self.left_anim.current_width().min(w);
        let right_w = self.right_anim.current_width().min(w.saturating_sub(left_w));
        let main_w = w.saturating_sub(left_w + right_w);
        WorkspaceLayout {
            left: Rect::new(0, 0, left_w, body_h),
            main: Rect::new(left_w, 0, main_w, body_h),
            right: Rect::new(left_w + main_w, 0, right_w, body_h),
            status: Rect::new(0, body_h, w, STATUS_ROWS.min(h)),
        }
    }

    fn relayout(&mut self) {
        let layout = self.layout();
        self.metrics.set_viewport(layout.main);
        self.system.set_viewport(layout.right);
    }

    pub fn render(&mut self, surface: &mut Surface) {
        let layout = self.layout();
        if layout.left.w > 0 {
            self.render_run_list(surface, layout.left);
        }
        if layout.main.w > 0 {
            self.metrics.render(surface);
        }
        if layout.right.w > 0 {
            self.system.render(surface);
        }
        self.render_status(surface, layout.status);
    }

    fn render_run_list(&self, surface: &mut Surface, rect: Rect) {
        if rect.w < 4 || rect.h < 3 {
            return;
        }
        let list_h = if self.pinned.is_some() {
            rect.h / 2
        } else {
            rect.h
        };
        let list_rect = Rect::new(rect.x, rect.y, rect.w, list_h);
        draw_border(surface, list_rect, Style::dim(), Some("runs"));
        let inner = list_rect.inner();
        for (i, key) in self
            .order
            .iter()
            .skip(self.list_cursor.saturating_sub(inner.h.saturating_sub(1) as usize))
            .take(inner.h as usize)
            .enumerate()
        {
            let selected = self.selected.contains(key);
            let pinned = self.pinned.as_ref() == Some(key);
            let state = self
                .runs
                .get(key)
                .map(|r| r.state)
                .unwrap_or(RunState::Loading);
            let marker = match (pinned, selected) {
                (true, _) => '★',
                (false, true) => '●',
                (false, false) => '○',
            };
            let line = clip_label(
                &format!("{marker} {key} [{}]", state.as_str()),
                inner.w,
            );
            let absolute = i + self.list_cursor.saturating_sub(inner.h.saturating_sub(1) as usize);
            let style = if absolute == self.list_cursor {
                Style::bold(Color::Reset)
            } else if selected {
                Style::default()
            } else {
                Style::dim()
            };
            draw_text(surface, inner.x, inner.y + i as u16, &line, style, inner.w);
        }

        // Pinned run's overview fills the lower half.
        if let Some(pinned) = &self.pinned
            && let Some(overview) = self.overviews.get(pinned)
        {
            let overview_rect = Rect::new(
                rect.x,
                rect.y + list_h,
                rect.w,
                rect.h.saturating_sub(list_h),
            );
            overview.render(surface, overview_rect);
        }
    }

    fn render_status(&self, surface: &mut Surface, rect: Rect) {
        if rect.h == 0 {
            return;
        }
        let running = self.running_count.load(Ordering::SeqCst);
        let mut status = format!(
            "{} runs  {} selected  {} running",
            self.order.len(),
            self.selected.len(),
            running
        );
        if let Some(target) = self.pending_grid_config {
            status = format!("{}: 1-9 (esc cancels)", target.as_str());
        }
        draw_text(surface, rect.x, rect.y, &status, Style::dim(), rect.w);
        let hints = "enter select  p pin  q quit  / filter  n/N page";
        let hx = rect.x + rect.w.saturating_sub(hints.len() as u16);
        draw_text(surface, hx, rect.y, hints, Style::dim(), rect.w);
    }
}

struct WorkspaceLayout {
    left: Rect,
    main: Rect,
    right: Rect,
    status: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn listing(key: &str, age_secs: u64) -> RunListing {
        RunListing {
            key: key.to_string(),
            path: std::env::temp_dir().join(format!("{key}.runlog")),
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 - age_secs),
        }
    }

    fn workspace() -> (Workspace, mpsc::Receiver<Msg>) {
        let (tx, rx) = mpsc::channel(64);
        let ws = Workspace::new(
            std::env::temp_dir(),
            tx,
            Config::default(),
            None,
        );
        (ws, rx)
    }

    #[tokio::test]
    async fn first_listing_auto_selects_and_pins_latest() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("old-run", 500), listing("new-run", 0)],
        });
        assert_eq!(ws.selected(), ["new-run".to_string()]);
        assert_eq!(ws.pinned(), Some(&"new-run".to_string()));
    }

    #[tokio::test]
    async fn later_listings_do_not_reselect() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("a", 10)],
        });
        ws.toggle_selection(&"a".to_string()); // deselect
        ws.update(Msg::RunDirs {
            entries: vec![listing("a", 10), listing("b", 0)],
        });
        assert!(ws.selected().is_empty(), "auto-select happens once");
    }

    #[tokio::test]
    async fn failed_open_reverts_selection_and_pin() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("ghost", 0)],
        });
        assert_eq!(ws.selected(), ["ghost".to_string()]);
        ws.update(Msg::ReaderOpened {
            run_key: "ghost".into(),
            result: Err("no such file".into()),
        });
        assert!(ws.selected().is_empty());
        assert_eq!(ws.pinned(), None);
    }

    #[tokio::test]
    async fn history_is_keyed_by_run_and_pinned_draws_on_top() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("run-b", 10), listing("run-a", 0)],
        });
        ws.update(Msg::WindowSize(WindowSizeMsg {
            width: 220,
            height: 60,
        }));
        ws.toggle_selection(&"run-b".to_string());

        let history = |key: &str| Msg::Batched {
            run_key: key.to_string(),
            batch: core_events::BatchedRecords {
                msgs: vec![RecordMsg::History(core_events::HistoryUpdate {
                    metrics: vec![(
                        "loss".to_string(),
                        core_events::MetricPoints {
                            xs: vec![0.0, 1.0],
                            ys: vec![1.0, 0.5],
                        },
                    )],
                })],
            },
        };
        ws.update(history("run-b"));
        ws.update(history("run-a"));

        let chart = ws.metrics().chart_by_title("loss").expect("shared chart");
        assert_eq!(chart.series_keys().last().map(String::as_str), Some("run-a"));
    }

    #[tokio::test]
    async fn deselect_removes_series_from_shared_grid() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("run-b", 10), listing("run-a", 0)],
        });
        ws.toggle_selection(&"run-b".to_string());
        let history = |key: &str| Msg::Batched {
            run_key: key.to_string(),
            batch: core_events::BatchedRecords {
                msgs: vec![RecordMsg::History(core_events::HistoryUpdate {
                    metrics: vec![(
                        "loss".to_string(),
                        core_events::MetricPoints {
                            xs: vec![0.0],
                            ys: vec![1.0],
                        },
                    )],
                })],
            },
        };
        ws.update(history("run-a"));
        ws.update(history("run-b"));

        ws.toggle_selection(&"run-b".to_string()); // deselect
        let chart = ws.metrics().chart_by_title("loss").expect("chart survives");
        assert_eq!(chart.series_keys(), ["run-a"]);
    }

    #[tokio::test]
    async fn pinning_a_deselected_run_selects_it() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("run-b", 10), listing("run-a", 0)],
        });
        ws.pin(&"run-b".to_string());
        assert!(ws.selected().contains(&"run-b".to_string()));
        assert_eq!(ws.pinned(), Some(&"run-b".to_string()));
    }

    #[tokio::test]
    async fn exit_records_transition_run_states() {
        let (mut ws, _rx) = workspace();
        ws.update(Msg::RunDirs {
            entries: vec![listing("run-a", 0)],
        });
        ws.update(Msg::Batched {
            run_key: "run-a".into(),
            batch: core_events::BatchedRecords {
                msgs: vec![
                    RecordMsg::Run(core_events::RunInfo {
                        id: "run-a".into(),
                        ..Default::default()
                    }),
                    RecordMsg::FileComplete { exit_code: 1 },
                ],
            },
        });
        assert_eq!(ws.run_state("run-a"), Some(RunState::Failed));
    }
}
