//! Message surface and channel policy for the runtop event loop.
//!
//! Everything the single-consumer UI loop can receive is declared here:
//! decoded record messages produced by the reader, batch envelopes for the
//! chunked-backfill and drain commands, and normalized input events. Producers
//! never touch UI state; they send values of these types into the loop's
//! bounded channel and the loop mutates state inside its own handlers.

use std::fmt;
use std::sync::atomic::AtomicU64;

// -------------------------------------------------------------------------------------------------
// Channel policy
// -------------------------------------------------------------------------------------------------
// The loop consumes from one bounded mpsc channel. Input and reader tasks use
// `send(..).await` (a parked producer is acceptable; record fidelity is not
// negotiable), while the watcher and heartbeat use `try_send` and drop on a
// full channel: a dropped wakeup is superseded by the next one, a dropped
// record batch is data loss.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Successful `try_send` wakeups that found room (watcher + heartbeat).
pub static WAKEUP_SENDS: AtomicU64 = AtomicU64::new(0);
/// Wakeups dropped because the channel was full at enqueue time.
pub static WAKEUP_DROPS: AtomicU64 = AtomicU64::new(0);
/// Record batches delivered to the loop (chunked + drained).
pub static BATCHES_DELIVERED: AtomicU64 = AtomicU64::new(0);

/// Stable identifier for one run within a session: the log file stem.
pub type RunKey = String;

// -------------------------------------------------------------------------------------------------
// Decoded record messages
// -------------------------------------------------------------------------------------------------

/// Run identity and configuration, decoded from the log's run record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunInfo {
    pub id: String,
    pub project: String,
    pub display_name: String,
    /// Flattened run configuration, insertion-ordered as decoded.
    pub config: Vec<(String, String)>,
}

/// One batch of scalar metric points, keyed by chart title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryUpdate {
    pub metrics: Vec<(String, MetricPoints)>,
}

/// Parallel sample arrays for one series. `xs.len() == ys.len()` is an
/// invariant enforced at decode time; consumers may assume it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricPoints {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// One system-telemetry sample: a timestamp plus named gauge values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsUpdate {
    /// Unix seconds.
    pub timestamp: f64,
    pub metrics: Vec<(String, f64)>,
}

/// Host environment facts (hostname, OS, accelerator inventory, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemInfoUpdate {
    pub pairs: Vec<(String, String)>,
}

/// Latest summary values for the run (best metric, last step, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryUpdate {
    pub pairs: Vec<(String, String)>,
}

/// A single decoded record, already translated out of its wire shape.
/// One wire record maps to zero or more of these.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordMsg {
    Run(RunInfo),
    History(HistoryUpdate),
    Stats(StatsUpdate),
    SystemInfo(SystemInfoUpdate),
    Summary(SummaryUpdate),
    /// Writer finished the log. Non-zero exit code marks the run failed.
    FileComplete { exit_code: i32 },
    /// Reader-side failure (corrupt frame, decode error). Fails the run.
    Error(String),
}

// -------------------------------------------------------------------------------------------------
// Batch envelopes
// -------------------------------------------------------------------------------------------------

/// Cumulative backfill progress carried on every chunked batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillProgress {
    pub records: u64,
    pub bytes: u64,
}

/// Result of one bounded backfill step. The loop re-issues the chunked read
/// while `has_more` holds, so startup stays responsive under a large log.
#[derive(Debug, Clone, Default)]
pub struct ChunkedBatch {
    pub msgs: Vec<RecordMsg>,
    /// True iff the step stopped on its budget rather than end-of-data.
    pub has_more: bool,
    pub progress: BackfillProgress,
}

/// Result of one live drain: everything available up to the first end-of-data.
#[derive(Debug, Clone, Default)]
pub struct BatchedRecords {
    pub msgs: Vec<RecordMsg>,
}

// -------------------------------------------------------------------------------------------------
// Normalized input events
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyMsg {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyMsg {
    pub fn char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::empty(),
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::CTRL,
        }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

impl fmt::Display for KeyMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("ctrl+")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            other => write!(f, "{}", key_name(other)),
        }
    }
}

fn key_name(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Char(_) => "char",
        KeyCode::Enter => "enter",
        KeyCode::Esc => "esc",
        KeyCode::Backspace => "backspace",
        KeyCode::Tab => "tab",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pgup",
        KeyCode::PageDown => "pgdn",
        KeyCode::Delete => "delete",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseMsg {
    pub x: u16,
    pub y: u16,
    pub kind: MouseEventKind,
    pub mods: KeyModifiers,
}

impl MouseMsg {
    pub fn alt_held(&self) -> bool {
        self.mods.contains(KeyModifiers::ALT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSizeMsg {
    pub width: u16,
    pub height: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_points_default_is_empty() {
        let pts = MetricPoints::default();
        assert!(pts.xs.is_empty());
        assert!(pts.ys.is_empty());
    }

    #[test]
    fn key_msg_display_includes_modifiers() {
        let k = KeyMsg::ctrl('l');
        assert_eq!(format!("{k}"), "ctrl+l");
        let pg = KeyMsg::plain(KeyCode::PageDown);
        assert_eq!(format!("{pg}"), "pgdn");
    }

    #[test]
    fn chunked_batch_defaults_to_terminal() {
        let batch = ChunkedBatch::default();
        assert!(!batch.has_more, "an empty batch must not re-arm backfill");
        assert_eq!(batch.progress, BackfillProgress::default());
    }

    #[test]
    fn mouse_alt_detection() {
        let m = MouseMsg {
            x: 3,
            y: 4,
            kind: MouseEventKind::Down(MouseButton::Right),
            mods: KeyModifiers::ALT,
        };
        assert!(m.alt_held());
    }
}
