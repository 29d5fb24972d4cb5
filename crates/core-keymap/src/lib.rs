//! Central key-binding registry.
//!
//! Pure and deterministic: resolution is a table lookup from a normalized
//! key event to a semantic action, with no side effects beyond TRACE
//! logging. Panels that capture input (filter editors, grid-config capture)
//! consume keys *before* this table is consulted; the registry only ever
//! sees keys in browse mode. Descriptions feed the help surface.

use core_events::{KeyCode, KeyModifiers, KeyMsg};
use tracing::trace;

/// Which grid dimension a `1-9` capture applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridConfigTarget {
    MetricsRows,
    MetricsCols,
    SystemRows,
    SystemCols,
}

impl GridConfigTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetricsRows => "metrics rows",
            Self::MetricsCols => "metrics cols",
            Self::SystemRows => "system rows",
            Self::SystemCols => "system cols",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleLeftSidebar,
    ToggleRightSidebar,
    NextPage,
    PrevPage,
    EnterFilter,
    ClearFilter,
    ToggleFilterMode,
    BeginGridConfig(GridConfigTarget),
    CycleOverviewSection,
    NavigateUp,
    NavigateDown,
    Select,
    TogglePin,
}

pub struct KeyBinding {
    pub key: KeyMsg,
    pub action: Action,
    pub description: &'static str,
}

pub struct KeyRegistry {
    bindings: Vec<KeyBinding>,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        let b = |key: KeyMsg, action: Action, description: &'static str| KeyBinding {
            key,
            action,
            description,
        };
        Self {
            bindings: vec![
                b(KeyMsg::char('q'), Action::Quit, "quit"),
                b(KeyMsg::ctrl('c'), Action::Quit, "quit"),
                b(KeyMsg::char('['), Action::ToggleLeftSidebar, "toggle left sidebar"),
                b(KeyMsg::char(']'), Action::ToggleRightSidebar, "toggle right sidebar"),
                b(KeyMsg::char('n'), Action::NextPage, "next page"),
                b(KeyMsg::char('N'), Action::PrevPage, "previous page"),
                b(KeyMsg::plain(KeyCode::PageDown), Action::NextPage, "next page"),
                b(KeyMsg::plain(KeyCode::PageUp), Action::PrevPage, "previous page"),
                b(KeyMsg::char('/'), Action::EnterFilter, "filter metrics"),
                b(KeyMsg::ctrl('l'), Action::ClearFilter, "clear filter"),
                b(KeyMsg::char('g'), Action::ToggleFilterMode, "toggle glob/regex filter"),
                b(
                    KeyMsg::char('r'),
                    Action::BeginGridConfig(GridConfigTarget::MetricsRows),
                    "set metrics grid rows (1-9)",
                ),
                b(
                    KeyMsg::char('c'),
                    Action::BeginGridConfig(GridConfigTarget::MetricsCols),
                    "set metrics grid cols (1-9)",
                ),
                b(
                    KeyMsg::char('R'),
                    Action::BeginGridConfig(GridConfigTarget::SystemRows),
                    "set system grid rows (1-9)",
                ),
                b(
                    KeyMsg::char('C'),
                    Action::BeginGridConfig(GridConfigTarget::SystemCols),
                    "set system grid cols (1-9)",
                ),
                b(KeyMsg::plain(KeyCode::Tab), Action::CycleOverviewSection, "cycle overview section"),
                b(KeyMsg::plain(KeyCode::Up), Action::NavigateUp, "move up"),
                b(KeyMsg::char('k'), Action::NavigateUp, "move up"),
                b(KeyMsg::plain(KeyCode::Down), Action::NavigateDown, "move down"),
                b(KeyMsg::char('j'), Action::NavigateDown, "move down"),
                b(KeyMsg::plain(KeyCode::Enter), Action::Select, "select run"),
                b(KeyMsg::char('p'), Action::TogglePin, "pin run"),
            ],
        }
    }
}

impl KeyRegistry {
    pub fn resolve(&self, key: &KeyMsg) -> Option<Action> {
        let action = self
            .bindings
            .iter()
            .find(|b| &b.key == key)
            .map(|b| b.action);
        if let Some(action) = action {
            trace!(target: "input.keymap", key = %key, ?action, "key_resolved");
        }
        action
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }
}

/// Digit payload for a pending grid-config capture.
pub fn capture_digit(key: &KeyMsg) -> Option<u16> {
    if key.mods != KeyModifiers::empty() && key.mods != KeyModifiers::SHIFT {
        return None;
    }
    match key.code {
        KeyCode::Char(c @ '1'..='9') => Some(c as u16 - '0' as u16),
        _ => None,
    }
}
