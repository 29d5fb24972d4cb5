//! Title filtering: draft/applied state plus the compiled matcher.
//!
//! Matching is case-insensitive. Regex is the default mode; glob mode
//! translates `*` and `?` before compiling, and a lone `*` means match-all.
//! A query that fails to compile degrades to case-insensitive substring
//! containment instead of silently matching nothing, because a dashboard must
//! never blank out while the user is mid-keystroke in a half-typed pattern.

use regex::{Regex, RegexBuilder};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Regex,
    Glob,
}

impl FilterMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Regex => Self::Glob,
            Self::Glob => Self::Regex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Glob => "glob",
        }
    }
}

/// Draft vs applied query state for one filterable panel.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    draft: String,
    applied: String,
    editing: bool,
    mode: FilterMode,
}

impl FilterState {
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn applied(&self) -> &str {
        &self.applied
    }

    pub fn is_active(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Begin editing; the draft starts from the applied query.
    pub fn enter_edit(&mut self) {
        self.draft = self.applied.clone();
        self.editing = true;
    }

    /// Live preview while typing.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_char(&mut self) {
        self.draft.pop();
    }

    /// Leave editing. Confirm promotes the draft to applied; cancel reverts
    /// to the previously applied query.
    pub fn exit_edit(&mut self, confirm: bool) {
        if confirm {
            self.applied = self.draft.clone();
        } else {
            self.draft = self.applied.clone();
        }
        self.editing = false;
    }

    pub fn clear(&mut self) {
        self.draft.clear();
        self.applied.clear();
        self.editing = false;
    }

    /// The query that should drive display right now: the draft while
    /// editing (live preview), the applied query otherwise.
    pub fn effective_query(&self) -> &str {
        if self.editing { &self.draft } else { &self.applied }
    }

    pub fn matcher(&self) -> FilterMatcher {
        FilterMatcher::compile(self.effective_query(), self.mode)
    }
}

/// Compiled matcher. `MatchAll` is the empty-query (and lone-`*` glob) fast
/// path.
#[derive(Debug, Clone)]
pub enum FilterMatcher {
    MatchAll,
    Pattern(Regex),
    /// Compile-failure fallback: lowercase substring containment.
    Substring(String),
}

impl FilterMatcher {
    pub fn compile(query: &str, mode: FilterMode) -> Self {
        if query.is_empty() {
            return Self::MatchAll;
        }
        let pattern = match mode {
            FilterMode::Regex => query.to_string(),
            FilterMode::Glob => {
                if query == "*" {
                    return Self::MatchAll;
                }
                glob_to_regex(query)
            }
        };
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => Self::Pattern(re),
            Err(e) => {
                debug!(target: "grid.filter", query, error = %e, "filter_compile_failed");
                Self::Substring(query.to_lowercase())
            }
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Pattern(re) => re.is_match(title),
            Self::Substring(needle) => title.to_lowercase().contains(needle),
        }
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c if "\\.+()[]{}^$|".contains(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
