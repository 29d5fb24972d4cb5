//! Single-run view: state machine, message dispatch, input routing, and
//! frame composition.
//!
//! Lifecycle: `Loading` until the run record arrives, then `Running` while
//! the writer is live. Backfill is chunked; the watcher and heartbeat start
//! only after the last chunk so live drains never interleave with backfill.
//! `Finished`/`Failed` tear the producers down immediately: the watcher is
//! signalled and every in-flight heartbeat is staled by generation.

use crate::animation::AnimationState;
use crate::msg::Msg;
use crate::overview::RunOverview;
use crate::stream::RunStream;
use core_events::{
    BackfillProgress, KeyCode, KeyMsg, MouseEventKind, MouseMsg, RecordMsg, RunKey, WindowSizeMsg,
};
use core_config::{ColorMode, Config};
use core_grid::{MetricsGrid, SeriesColorMode, SystemColorMode, SystemMetricsGrid};
use core_keymap::{Action, GridConfigTarget, KeyRegistry, capture_digit};
use core_render::text::draw_text;
use core_render::{Rect, Style, Surface};
use core_watch::HeartbeatManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Series key used by the single-run view, where each chart holds one line.
pub const SINGLE_RUN_SERIES: &str = "Default";

const ANIMATION_FRAME: Duration = Duration::from_millis(33);
const ANIMATION_DURATION: Duration = Duration::from_millis(200);
const STATUS_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Loading,
    Running,
    Finished,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

/// What a message handler produced, absorbed across nested dispatches.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateOutcome {
    pub quit: bool,
    pub dirty: bool,
}

impl UpdateOutcome {
    pub fn dirty() -> Self {
        Self {
            quit: false,
            dirty: true,
        }
    }

    pub fn absorb(&mut self, other: UpdateOutcome) {
        self.quit |= other.quit;
        self.dirty |= other.dirty;
    }
}

pub struct Run {
    key: RunKey,
    state: RunState,
    stream: Option<RunStream>,
    heartbeat: HeartbeatManager<Msg>,
    running_flag: Arc<AtomicBool>,

    metrics: MetricsGrid,
    system: SystemMetricsGrid,
    overview: RunOverview,

    left_anim: AnimationState,
    right_anim: AnimationState,
    /// One-shot animating tokens: a toggle is rejected while the previous
    /// animation still runs.
    left_ticking: bool,
    right_ticking: bool,

    keymap: KeyRegistry,
    pending_grid_config: Option<GridConfigTarget>,

    tx: mpsc::Sender<Msg>,
    window: (u16, u16),
    progress: BackfillProgress,
    backfill_done: bool,
    status_error: Option<String>,
    exit_code: Option<i32>,

    config: Config,
    config_path: Option<PathBuf>,
}

impl Run {
    pub fn new(
        key: RunKey,
        path: PathBuf,
        tx: mpsc::Sender<Msg>,
        config: Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        let running_flag = Arc::new(AtomicBool::new(false));
        let predicate_flag = running_flag.clone();
        let heartbeat = HeartbeatManager::new(
            Duration::from_secs(config.heartbeat_interval_seconds),
            tx.clone(),
            Msg::Heartbeat,
            move || predicate_flag.load(Ordering::SeqCst),
        );

        let metrics = MetricsGrid::new(
            config.metrics_grid.rows,
            config.metrics_grid.cols,
            config.per_plot_color_scheme,
            match config.single_run_color_mode {
                ColorMode::PerPlot => SeriesColorMode::PerPlot,
                ColorMode::PerSeries => SeriesColorMode::PerSeries,
            },
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

        let stream = RunStream::spawn(key.clone(), path, tx.clone());
        stream.request_chunk();
        info!(target: "model.run", run = key.as_str(), "run_opened");

        Self {
            key,
            state: RunState::Loading,
            stream: Some(stream),
            heartbeat,
            running_flag,
            metrics,
            system,
            overview: RunOverview::default(),
            left_anim: AnimationState::new(32, ANIMATION_DURATION, config.left_sidebar_visible),
            right_anim: AnimationState::new(42, ANIMATION_DURATION, config.right_sidebar_visible),
            left_ticking: false,
            right_ticking: false,
            keymap: KeyRegistry::default(),
            pending_grid_config: None,
            tx,
            window: (0, 0),
            progress: BackfillProgress::default(),
            backfill_done: false,
            status_error: None,
            exit_code: None,
            config,
            config_path,
        }
    }

    pub fn key(&self) -> &RunKey {
        &self.key
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn metrics(&self) -> &MetricsGrid {
        &self.metrics
    }

    pub fn overview(&self) -> &RunOverview {
        &self.overview
    }

    pub fn backfill_done(&self) -> bool {
        self.backfill_done
    }

    // ---------------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------------

    pub fn update(&mut self, msg: Msg) -> UpdateOutcome {
        match msg {
            Msg::Chunked { batch, .. } => {
                let mut outcome = self.apply_records(batch.msgs);
                self.progress = batch.progress;
                if batch.has_more && !self.state.is_terminal() {
                    if let Some(stream) = &self.stream {
                        stream.request_chunk();
                    }
                } else if !self.backfill_done {
                    self.backfill_done = true;
                    self.enter_live_mode();
                }
                outcome.dirty = true;
                outcome
            }
            Msg::Batched { batch, .. } => self.apply_records(batch.msgs),
            Msg::Heartbeat => {
                if self.state == RunState::Running {
                    if let Some(stream) = &self.stream {
                        stream.request_drain();
                    }
                    self.heartbeat.reset();
                }
                UpdateOutcome::default()
            }
            Msg::FileChanged { .. } => {
                if self.state == RunState::Running {
                    self.heartbeat.reset();
                    if let Some(stream) = &self.stream {
                        stream.request_drain();
                    }
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
                let complete = self.left_anim.update(Instant::now());
                if complete {
                    self.left_ticking = false;
                } else {
                    schedule_frame(self.tx.clone(), Msg::LeftSidebarAnimation);
                }
                self.relayout();
                UpdateOutcome::dirty()
            }
            Msg::RightSidebarAnimation => {
                let complete = self.right_anim.update(Instant::now());
                if complete {
                    self.right_ticking = false;
                } else {
                    schedule_frame(self.tx.clone(), Msg::RightSidebarAnimation);
                }
                self.relayout();
                UpdateOutcome::dirty()
            }
            // Workspace-only messages are not ours.
            Msg::ReaderOpened { .. } | Msg::RunDirs { .. } => UpdateOutcome::default(),
        }
    }

    fn apply_records(&mut self, msgs: Vec<RecordMsg>) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        for msg in msgs {
            match msg {
                RecordMsg::Run(info) => {
                    self.overview.apply_run_info(&info);
                    if self.state == RunState::Loading {
                        self.set_state(RunState::Running);
                    }
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::History(update) => {
                    self.metrics.process_history(&update, SINGLE_RUN_SERIES);
                    if self.state == RunState::Running {
                        self.heartbeat.reset();
                    }
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::Stats(update) => {
                    self.system.process_stats(&update);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::SystemInfo(info) => {
                    self.overview.apply_system_info(&info);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::Summary(summary) => {
                    self.overview.apply_summary(&summary);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::FileComplete { exit_code } => {
                    self.exit_code = Some(exit_code);
                    let next = if exit_code == 0 {
                        RunState::Finished
                    } else {
                        RunState::Failed
                    };
                    self.set_state(next);
                    outcome.absorb(UpdateOutcome::dirty());
                }
                RecordMsg::Error(err) => {
                    error!(target: "model.run", run = self.key.as_str(), error = err.as_str(), "run_failed");
                    self.status_error = Some(err);
                    self.set_state(RunState::Failed);
                    outcome.absorb(UpdateOutcome::dirty());
                }
            }
        }
        outcome
    }

    fn set_state(&mut self, next: RunState) {
        if self.state == next {
            return;
        }
        info!(
            target: "model.run",
            run = self.key.as_str(),
            from = self.state.as_str(),
            to = next.as_str(),
            "run_state"
        );
        self.state = next;
        self.running_flag
            .store(next == RunState::Running, Ordering::SeqCst);
        if next.is_terminal() {
            self.heartbeat.stop();
            if let Some(stream) = &mut self.stream {
                stream.stop_watcher();
            }
        }
    }

    /// Backfill complete: start change detection for the live tail.
    fn enter_live_mode(&mut self) {
        if !matches!(self.state, RunState::Running | RunState::Loading) {
            return;
        }
        if let Some(stream) = &mut self.stream
            && !stream.watcher_running()
        {
            if let Err(e) = stream.start_watcher(self.tx.clone()) {
                warn!(
                    target: "model.run",
                    run = self.key.as_str(),
                    error = %e,
                    "watcher_start_failed"
                );
            }
            self.heartbeat.start();
        }
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    /// Key routing order: filter editors, then grid-config capture, then the
    /// central key map.
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
        self.apply_action(action)
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
        self.apply_grid_config(target, value);
        UpdateOutcome::dirty()
    }

    fn apply_grid_config(&mut self, target: GridConfigTarget, value: u16) {
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
        self.persist_config();
    }

    fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = core_config::save_to(path, &self.config) {
            warn!(target: "model.run", error = %e, "config_save_failed");
        }
    }

    fn apply_action(&mut self, action: Action) -> UpdateOutcome {
        match action {
            Action::Quit => UpdateOutcome {
                quit: true,
                dirty: false,
            },
            Action::ToggleLeftSidebar => {
                self.toggle_sidebar(true);
                UpdateOutcome::dirty()
            }
            Action::ToggleRightSidebar => {
                self.toggle_sidebar(false);
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
                self.overview.cycle_section();
                UpdateOutcome::dirty()
            }
            Action::NavigateUp => {
                self.overview.move_cursor(-1, self.overview_page_size());
                UpdateOutcome::dirty()
            }
            Action::NavigateDown => {
                self.overview.move_cursor(1, self.overview_page_size());
                UpdateOutcome::dirty()
            }
            // Run-list actions only exist in the workspace view.
            Action::Select | Action::TogglePin => UpdateOutcome::default(),
        }
    }

    /// Toggles are rejected while the previous animation is still running.
    fn toggle_sidebar(&mut self, left: bool) {
        let (anim, ticking, msg) = if left {
            (&mut self.left_anim, &mut self.left_ticking, Msg::LeftSidebarAnimation)
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
            let delta = match mouse.kind {
                MouseEventKind::ScrollUp => -1,
                MouseEventKind::ScrollDown => 1,
                _ => return UpdateOutcome::default(),
            };
            self.overview.move_cursor(delta, self.overview_page_size());
            return UpdateOutcome::dirty();
        }
        if layout.right.contains(mouse.x, mouse.y) {
            let delta = match mouse.kind {
                MouseEventKind::ScrollUp => -1,
                MouseEventKind::ScrollDown => 1,
                _ => return UpdateOutcome::default(),
            };
            self.system.navigate(delta);
            return UpdateOutcome::dirty();
        }
        UpdateOutcome::default()
    }

    // ---------------------------------------------------------------------
    // Layout and render
    // ---------------------------------------------------------------------

    fn overview_page_size(&self) -> usize {
        self.layout().left.h.saturating_sub(6) as usize
    }

    fn layout(&self) -> RunLayout {
        let (w, h) = self.window;
        let body_h = h.saturating_sub(STATUS_ROWS);
        let left_w = self.left_anim.current_width().min(w);
        let right_w = self.right_anim.current_width().min(w.saturating_sub(left_w));
        let main_w = w.saturating_sub(left_w + right_w);
        RunLayout {
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
            self.overview.render(surface, layout.left);
        }
        if layout.main.w > 0 {
            self.metrics.render(surface);
        }
        if layout.right.w > 0 {
            self.system.render(surface);
        }
        self.render_status(surface, layout.status);
    }

    fn render_status(&self, surface: &mut Surface, rect: Rect) {
        if rect.h == 0 {
            return;
        }
        let name = self.overview.display_name();
        let shown_name = if name.is_empty() { self.key.as_str() } else { name };
        let mut status = format!("{shown_name} [{}]", self.state.as_str());
        if !self.backfill_done {
            status.push_str(&format!(" backfill {} records", self.progress.records));
        }
        if let Some(err) = &self.status_error {
            status.push_str(": ");
            status.push_str(err);
        } else if let Some(code) = self.exit_code
            && code != 0
        {
            status.push_str(&format!(" exit {code}"));
        }
        if let Some(target) = self.pending_grid_config {
            status = format!("{}: 1-9 (esc cancels)", target.as_str());
        }
        draw_text(surface, rect.x, rect.y, &status, Style::dim(), rect.w);

        let hints = "q quit  / filter  n/N page  [ ] sidebars";
        let hx = rect.x + rect.w.saturating_sub(hints.len() as u16);
        draw_text(surface, hx, rect.y, hints, Style::dim(), rect.w);
    }
}

struct RunLayout {
    left: Rect,
    main: Rect,
    right: Rect,
    status: Rect,
}

/// Post an animation frame message after one frame delay.
pub(crate) fn schedule_frame(tx: mpsc::Sender<Msg>, msg: Msg) {
    tokio::spawn(async move {
        tokio::time::sleep(ANIMATION_FRAME).await;
        let _ = tx.send(msg).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{BatchedRecords, ChunkedBatch, HistoryUpdate, MetricPoints};

    fn test_run() -> (Run, mpsc::Receiver<Msg>) {
        let (tx, rx) = mpsc::channel(64);
        let dir = std::env::temp_dir().join("runtop-test-absent.runlog");
        let run = Run::new(
            "trial".to_string(),
            dir,
            tx,
            Config::default(),
            None,
        );
        (run, rx)
    }

    fn history(title: &str, xs: &[f64], ys: &[f64]) -> RecordMsg {
        RecordMsg::History(HistoryUpdate {
            metrics: vec![(
                title.to_string(),
                MetricPoints {
                    xs: xs.to_vec(),
                    ys: ys.to_vec(),
                },
            )],
        })
    }

    #[tokio::test]
    async fn run_record_transitions_to_running() {
        let (mut run, _rx) = test_run();
        assert_eq!(run.state(), RunState::Loading);
        run.update(Msg::Batched {
            run_key: "trial".into(),
            batch: BatchedRecords {
                msgs: vec![RecordMsg::Run(core_events::RunInfo {
                    id: "trial".into(),
                    ..Default::default()
                })],
            },
        });
        assert_eq!(run.state(), RunState::Running);
    }

    #[tokio::test]
    async fn zero_exit_finishes_nonzero_fails() {
        let (mut run, _rx) = test_run();
        run.update(Msg::Batched {
            run_key: "trial".into(),
            batch: BatchedRecords {
                msgs: vec![RecordMsg::FileComplete { exit_code: 0 }],
            },
        });
        assert_eq!(run.state(), RunState::Finished);

        let (mut failing, _rx) = test_run();
        failing.update(Msg::Batched {
            run_key: "trial".into(),
            batch: BatchedRecords {
                msgs: vec![RecordMsg::FileComplete { exit_code: 3 }],
            },
        });
        assert_eq!(failing.state(), RunState::Failed);
    }

    #[tokio::test]
    async fn error_msg_fails_the_run() {
        let (mut run, _rx) = test_run();
        run.update(Msg::Batched {
            run_key: "trial".into(),
            batch: BatchedRecords {
                msgs: vec![RecordMsg::Error("crc mismatch".into())],
            },
        });
        assert_eq!(run.state(), RunState::Failed);
    }

    #[tokio::test]
    async fn history_lands_in_metrics_grid() {
        let (mut run, _rx) = test_run();
        run.update(Msg::WindowSize(WindowSizeMsg {
            width: 200,
            height: 50,
        }));
        run.update(Msg::Batched {
            run_key: "trial".into(),
            batch: BatchedRecords {
                msgs: vec![history("train/loss", &[0.0, 1.0], &[1.0, 0.5])],
            },
        });
        assert_eq!(run.metrics().len(), 1);
        assert!(run.metrics().chart_by_title("train/loss").is_some());
    }

    #[tokio::test]
    async fn chunked_without_more_completes_backfill() {
        let (mut run, _rx) = test_run();
        run.update(Msg::Chunked {
            run_key: "trial".into(),
            batch: ChunkedBatch {
                msgs: vec![],
                has_more: false,
                progress: BackfillProgress::default(),
            },
        });
        assert!(run.backfill_done());
    }

    #[tokio::test]
    async fn quit_key_requests_exit() {
        let (mut run, _rx) = test_run();
        let outcome = run.update(Msg::Key(KeyMsg::char('q')));
        assert!(outcome.quit);
    }

    #[tokio::test]
    async fn grid_config_capture_accepts_digit_and_esc() {
        let (mut run, _rx) = test_run();
        run.update(Msg::Key(KeyMsg::char('c')));
        run.update(Msg::Key(KeyMsg::char('4')));
        assert_eq!(run.metrics().grid_config().1, 4);

        run.update(Msg::Key(KeyMsg::char('r')));
        run.update(Msg::Key(KeyMsg::plain(KeyCode::Esc)));
        // Cancelled: rows unchanged from default.
        assert_eq!(run.metrics().grid_config().0, Config::default().metrics_grid.rows);
    }

    #[tokio::test]
    async fn filter_editing_consumes_keys_before_keymap() {
        let (mut run, _rx) = test_run();
        run.update(Msg::Key(KeyMsg::char('/')));
        assert!(run.metrics().filter.editing());
        // 'q' must extend the draft, not quit.
        let outcome = run.update(Msg::Key(KeyMsg::char('q')));
        assert!(!outcome.quit);
        assert_eq!(run.metrics().filter.draft(), "q");
        run.update(Msg::Key(KeyMsg::plain(KeyCode::Enter)));
        assert!(!run.metrics().filter.editing());
        assert_eq!(run.metrics().filter.applied(), "q");
    }

    #[tokio::test]
    async fn second_toggle_rejected_while_animating() {
        let (mut run, _rx) = test_run();
        run.update(Msg::Key(KeyMsg::char('[')));
        let phase_after_first = run.left_anim.phase();
        run.update(Msg::Key(KeyMsg::char('[')));
        assert_eq!(
            run.left_anim.phase(),
            phase_after_first,
            "animating token must reject the second toggle"
        );
    }
}
