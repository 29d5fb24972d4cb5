//! Async input task: crossterm `EventStream` normalized into loop messages.
//!
//! One task, one shutdown handle. The task exits on the shutdown signal, on
//! channel closure (loop gone), or when the stream ends, and logs which.

use core_events::{
    KeyCode, KeyModifiers, KeyMsg, MouseButton, MouseEventKind, MouseMsg, WindowSizeMsg,
};
use core_model::Msg;
use crossterm::event::{
    Event as CEvent, EventStream, KeyCode as CKeyCode, KeyEventKind as CKind,
    KeyModifiers as CMods, MouseButton as CButton, MouseEventKind as CMouseKind,
};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct InputShutdown {
    notify: Arc<Notify>,
}

impl InputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

pub fn spawn_input_task(tx: Sender<Msg>) -> (JoinHandle<()>, InputShutdown) {
    let notify = Arc::new(Notify::new());
    let shutdown = InputShutdown {
        notify: notify.clone(),
    };
    let handle = tokio::spawn(async move {
        let mut stream = EventStream::new();
        let mut reason = ExitReason::StreamEnded;
        info!(target: "input.task", "input_task_started");
        loop {
            let next = tokio::select! {
                biased;
                _ = notify.notified() => {
                    reason = ExitReason::ShutdownSignal;
                    break;
                }
                event = stream.next() => event,
            };
            let Some(result) = next else { break };
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    warn!(target: "input.task", error = %e, "event_stream_error");
                    reason = ExitReason::StreamError;
                    break;
                }
            };
            let Some(msg) = translate(event) else {
                continue;
            };
            if tx.send(msg).await.is_err() {
                reason = ExitReason::ChannelClosed;
                break;
            }
        }
        info!(target: "input.task", reason = reason.as_str(), "input_task_stopped");
    });
    (handle, shutdown)
}

fn translate(event: CEvent) -> Option<Msg> {
    match event {
        CEvent::Key(key) if matches!(key.kind, CKind::Press | CKind::Repeat) => {
            let code = map_key_code(key.code)?;
            Some(Msg::Key(KeyMsg {
                code,
                mods: map_mods(key.modifiers),
            }))
        }
        CEvent::Mouse(mouse) => {
            let kind = map_mouse_kind(mouse.kind)?;
            Some(Msg::Mouse(MouseMsg {
                x: mouse.column,
                y: mouse.row,
                kind,
                mods: map_mods(mouse.modifiers),
            }))
        }
        CEvent::Resize(width, height) => Some(Msg::WindowSize(WindowSizeMsg { width, height })),
        _ => None,
    }
}

fn map_key_code(code: CKeyCode) -> Option<KeyCode> {
    Some(match code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Delete => KeyCode::Delete,
        _ => return None,
    })
}

fn map_mods(mods: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

fn map_mouse_kind(kind: CMouseKind) -> Option<MouseEventKind> {
    Some(match kind {
        CMouseKind::Down(b) => MouseEventKind::Down(map_button(b)?),
        CMouseKind::Up(b) => MouseEventKind::Up(map_button(b)?),
        CMouseKind::Drag(b) => MouseEventKind::Drag(map_button(b)?),
        CMouseKind::ScrollUp => MouseEventKind::ScrollUp,
        CMouseKind::ScrollDown => MouseEventKind::ScrollDown,
        CMouseKind::Moved => MouseEventKind::Moved,
        _ => return None,
    })
}

fn map_button(button: CButton) -> Option<MouseButton> {
    Some(match button {
        CButton::Left => MouseButton::Left,
        CButton::Middle => MouseButton::Middle,
        CButton::Right => MouseButton::Right,
    })
}
