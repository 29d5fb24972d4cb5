//! runtop entrypoint: live terminal dashboard for training-run logs.
//!
//! Point it at a single `.runlog` file for the run view, or at a directory
//! of run logs for the multi-run workspace. All UI state is owned by one
//! event loop; input, readers, watchers, and timers are producer tasks that
//! only send messages.

mod input;
mod scan;

use anyhow::{Result, bail};
use clap::Parser;
use core_events::{EVENT_CHANNEL_CAP, WindowSizeMsg};
use core_model::{Msg, Run, UpdateOutcome, Workspace};
use core_render::Surface;
use core_render::writer::Writer;
use core_terminal::{CrosstermBackend, TerminalBackend};
use input::{InputShutdown, spawn_input_task};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// How many queued messages one loop turn may absorb before rendering.
/// Keeps a chatty backfill from starving the screen.
const MAX_BATCHED_MSGS: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "runtop", version, about = "Live dashboard for training run logs")]
struct Args {
    /// A `.runlog` file (single-run view) or a directory of run logs
    /// (workspace view).
    pub path: PathBuf,
    /// Configuration file path (overrides discovery of `runtop.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

enum View {
    Single(Box<Run>),
    Workspace(Box<Workspace>),
}

impl View {
    fn update(&mut self, msg: Msg) -> UpdateOutcome {
        match self {
            View::Single(run) => run.update(msg),
            View::Workspace(ws) => ws.update(msg),
        }
    }

    fn render(&mut self, surface: &mut Surface) {
        match self {
            View::Single(run) => run.render(surface),
            View::Workspace(ws) => ws.render(surface),
        }
    }
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) {
        let file_appender = tracing_appender::rolling::never(Path::new("."), "runtop.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |panic_info| {
                tracing::error!(target: "runtime.panic", ?panic_info, "panic");
                default_panic(panic_info);
            }));
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

struct AppRuntime {
    view: View,
    surface: Surface,
    rx: mpsc::Receiver<Msg>,
    input_shutdown: InputShutdown,
    window: (u16, u16),
    dirty: bool,
}

impl AppRuntime {
    async fn run(&mut self) -> Result<()> {
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        'outer: while let Some(first) = self.rx.recv().await {
            let mut outcome = self.handle(first);
            // Absorb whatever else is already queued before paying for a
            // render, bounded so input latency stays visible.
            let mut absorbed = 0;
            while absorbed < MAX_BATCHED_MSGS && !outcome.quit {
                match self.rx.try_recv() {
                    Ok(msg) => {
                        outcome.absorb(self.handle(msg));
                        absorbed += 1;
                    }
                    Err(_) => break,
                }
            }
            if outcome.quit {
                reason = ShutdownReason::Quit;
                break 'outer;
            }
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }
        }

        info!(target: "runtime.shutdown", reason = reason.as_str(), "shutdown");
        self.input_shutdown.signal();
        Ok(())
    }

    fn handle(&mut self, msg: Msg) -> UpdateOutcome {
        if let Msg::WindowSize(WindowSizeMsg { width, height }) = &msg {
            self.window = (*width, *height);
        }
        let outcome = self.view.update(msg);
        self.dirty |= outcome.dirty;
        outcome
    }

    fn render(&mut self) -> Result<()> {
        let (w, h) = self.window;
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.surface.resize(w, h);
        self.surface.clear();
        self.view.render(&mut self.surface);
        Writer::new(stdout()).flush_surface(&self.surface)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging();
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config_path = args.config.clone().unwrap_or_else(core_config::discover);
    let config = core_config::load_from(Some(config_path.clone()));

    let meta = std::fs::metadata(&args.path);
    let is_dir = match &meta {
        Ok(m) => m.is_dir(),
        Err(_) => bail!("no such run log or directory: {}", args.path.display()),
    };

    startup.backend.set_title("runtop")?;
    let _guard = startup.backend.enter_guard()?;

    let (tx, rx) = mpsc::channel::<Msg>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = spawn_input_task(tx.clone());

    let view = if is_dir {
        scan::spawn_scanner(args.path.clone(), tx.clone());
        View::Workspace(Box::new(Workspace::new(
            args.path.clone(),
            tx.clone(),
            config,
            Some(config_path),
        )))
    } else {
        let key = args
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("run")
            .to_string();
        View::Single(Box::new(Run::new(
            key,
            args.path.clone(),
            tx.clone(),
            config,
            Some(config_path),
        )))
    };

    // Seed the first layout pass before any input arrives.
    let (width, height) = crossterm::terminal::size()?;
    let _ = tx
        .send(Msg::WindowSize(WindowSizeMsg { width, height }))
        .await;

    let mut runtime = AppRuntime {
        view,
        surface: Surface::new(width, height),
        rx,
        input_shutdown,
        window: (width, height),
        dirty: true,
    };

    // The loop holds the only non-producer sender; dropping `tx` on exit
    // lets producer tasks observe closure and stop.
    drop(tx);
    let result = runtime.run().await;
    if let Err(e) = &result {
        error!(target: "runtime", error = %e, "event_loop_failed");
    }
    let _ = tokio::time::timeout(std::time::Duration::from_millis(250), input_task).await;
    result
}
