//! Run-overview panel: environment, config, and summary key-value sections
//! with per-section pagination, a cursor, and a section-scoped filter.
//!
//! Filter queries may carry a section prefix (`@e`, `@c`, `@s`) that pins
//! matching to one section; without a prefix the query applies to whichever
//! section is active. Matching runs over both keys and values.

use core_events::{RunInfo, SummaryUpdate, SystemInfoUpdate};
use core_grid::{FilterMatcher, FilterState};
use core_render::text::{clip_label, draw_border, draw_text};
use core_render::{Rect, Style, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverviewSection {
    #[default]
    Environment,
    Config,
    Summary,
}

impl OverviewSection {
    pub fn next(self) -> Self {
        match self {
            Self::Environment => Self::Config,
            Self::Config => Self::Summary,
            Self::Summary => Self::Environment,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Environment => "Environment",
            Self::Config => "Config",
            Self::Summary => "Summary",
        }
    }

    fn from_prefix(tag: char) -> Option<Self> {
        match tag {
            'e' => Some(Self::Environment),
            'c' => Some(Self::Config),
            's' => Some(Self::Summary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SectionState {
    pairs: Vec<(String, String)>,
    cursor: usize,
    page: usize,
}

#[derive(Debug, Default)]
pub struct RunOverview {
    run_id: String,
    display_name: String,
    project: String,
    environment: SectionState,
    config: SectionState,
    summary: SectionState,
    active: OverviewSection,
    pub filter: FilterState,
}

impl RunOverview {
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.run_id
        } else {
            &self.display_name
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn active_section(&self) -> OverviewSection {
        self.active
    }

    pub fn cycle_section(&mut self) {
        self.active = self.active.next();
    }

    pub fn apply_run_info(&mut self, info: &RunInfo) {
        self.run_id = info.id.clone();
        self.display_name = info.display_name.clone();
        self.project = info.project.clone();
        self.config.pairs = info.config.clone();
        self.clamp_cursors();
    }

    pub fn apply_system_info(&mut self, info: &SystemInfoUpdate) {
        for (k, v) in &info.pairs {
            upsert(&mut self.environment.pairs, k, v);
        }
        self.clamp_cursors();
    }

    /// Summaries overwrite by key; the newest value wins.
    pub fn apply_summary(&mut self, summary: &SummaryUpdate) {
        for (k, v) in &summary.pairs {
            upsert(&mut self.summary.pairs, k, v);
        }
        self.clamp_cursors();
    }

    fn section(&self, which: OverviewSection) -> &SectionState {
        match which {
            OverviewSection::Environment => &self.environment,
            OverviewSection::Config => &self.config,
            OverviewSection::Summary => &self.summary,
        }
    }

    fn section_mut(&mut self, which: OverviewSection) -> &mut SectionState {
        match which {
            OverviewSection::Environment => &mut self.environment,
            OverviewSection::Config => &mut self.config,
            OverviewSection::Summary => &mut self.summary,
        }
    }

    /// Query with any `@e|@c|@s` prefix stripped, plus the section it pins.
    fn effective_filter(&self) -> (Option<OverviewSection>, FilterMatcher) {
        let query = self.filter.effective_query();
        let trimmed = query.trim_start();
        if let Some(rest) = trimmed.strip_prefix('@')
            && let Some(tag) = rest.chars().next()
            && let Some(section) = OverviewSection::from_prefix(tag)
        {
            let pattern = rest[tag.len_utf8()..].trim_start();
            return (
                Some(section),
                FilterMatcher::compile(pattern, self.filter.mode()),
            );
        }
        (None, FilterMatcher::compile(query, self.filter.mode()))
    }

    /// Pairs of `which` passing the current filter.
    pub fn visible_pairs(&self, which: OverviewSection) -> Vec<&(String, String)> {
        let (pinned, matcher) = self.effective_filter();
        let filter_applies = match pinned {
            Some(section) => section == which,
            None => self.active == which,
        };
        self.section(which)
            .pairs
            .iter()
            .filter(|(k, v)| !filter_applies || matcher.matches(k) || matcher.matches(v))
            .collect()
    }

    pub fn cursor(&self, which: OverviewSection) -> usize {
        self.section(which).cursor
    }

    pub fn page(&self, which: OverviewSection) -> usize {
        self.section(which).page
    }

    /// Move the active section's cursor, re-paging to keep it visible.
    pub fn move_cursor(&mut self, delta: isize, page_size: usize) {
        let visible = self.visible_pairs(self.active).len();
        let state = self.section_mut(self.active);
        if visible == 0 {
            state.cursor = 0;
            state.page = 0;
            return;
        }
        let cursor = state.cursor as isize + delta;
        state.cursor = cursor.clamp(0, visible as isize - 1) as usize;
        if page_size > 0 {
            state.page = state.cursor / page_size;
        }
    }

    fn clamp_cursors(&mut self) {
        for which in [
            OverviewSection::Environment,
            OverviewSection::Config,
            OverviewSection::Summary,
        ] {
            let visible = self.visible_pairs(which).len();
            let state = self.section_mut(which);
            if state.cursor >= visible {
                state.cursor = visible.saturating_sub(1);
            }
        }
    }
}

impl RunOverview {
    /// Compose the sidebar panel: identity header, section tabs, and the
    /// active section's rows with the cursor row highlighted.
    pub fn render(&self, surface: &mut Surface, rect: Rect) {
        if rect.w < 4 || rect.h < 4 {
            return;
        }
        draw_border(surface, rect, Style::dim(), Some(self.display_name()));
        let inner = rect.inner();

        let mut y = inner.y;
        if !self.project.is_empty() && y < inner.y + inner.h {
            let line = clip_label(&format!("project: {}", self.project), inner.w);
            draw_text(surface, inner.x, y, &line, Style::dim(), inner.w);
            y += 1;
        }

        // Section tabs, active one emphasized.
        let mut x = inner.x;
        for which in [
            OverviewSection::Environment,
            OverviewSection::Config,
            OverviewSection::Summary,
        ] {
            let style = if which == self.active {
                Style::bold(core_render::Color::Reset)
            } else {
                Style::dim()
            };
            let label = which.label();
            let used = draw_text(surface, x, y, label, style, inner.w.saturating_sub(x - inner.x));
            x = x.saturating_add(used + 2);
        }
        y += 1;

        let rows = inner.h.saturating_sub(y - inner.y) as usize;
        if rows == 0 {
            return;
        }
        let pairs = self.visible_pairs(self.active);
        let cursor = self.cursor(self.active).min(pairs.len().saturating_sub(1));
        let page = if rows > 0 { cursor / rows } else { 0 };
        let start = page * rows;
        for (i, (k, v)) in pairs.iter().skip(start).take(rows).enumerate() {
            let absolute = start + i;
            let style = if absolute == cursor && !pairs.is_empty() {
                Style::bold(core_render::Color::Reset)
            } else {
                Style::default()
            };
            let line = clip_label(&format!("{k}: {v}"), inner.w);
            draw_text(surface, inner.x, y + i as u16, &line, style, inner.w);
        }
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview_with_data() -> RunOverview {
        let mut o = RunOverview::default();
        o.apply_run_info(&RunInfo {
            id: "r1".into(),
            project: "proj".into(),
            display_name: "sweep-7".into(),
            config: vec![
                ("lr".into(), "0.001".into()),
                ("optimizer".into(), "adamw".into()),
            ],
        });
        o.apply_system_info(&SystemInfoUpdate {
            pairs: vec![("hostname".into(), "trainbox".into())],
        });
        o.apply_summary(&SummaryUpdate {
            pairs: vec![("best_loss".into(), "0.12".into())],
        });
        o
    }

    #[test]
    fn sections_populate_independently() {
        let o = overview_with_data();
        assert_eq!(o.display_name(), "sweep-7");
        assert_eq!(o.visible_pairs(OverviewSection::Config).len(), 2);
        assert_eq!(o.visible_pairs(OverviewSection::Environment).len(), 1);
        assert_eq!(o.visible_pairs(OverviewSection::Summary).len(), 1);
    }

    #[test]
    fn summary_upserts_by_key() {
        let mut o = overview_with_data();
        o.apply_summary(&SummaryUpdate {
            pairs: vec![("best_loss".into(), "0.05".into())],
        });
        let pairs = o.visible_pairs(OverviewSection::Summary);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, "0.05");
    }

    #[test]
    fn section_prefix_pins_filter_scope() {
        let mut o = overview_with_data();
        o.filter.set_draft("@c lr");
        o.filter.exit_edit(true);
        // Config is filtered even though Environment is the active section.
        assert_eq!(o.visible_pairs(OverviewSection::Config).len(), 1);
        assert_eq!(o.visible_pairs(OverviewSection::Config)[0].0, "lr");
        // Other sections are untouched by a pinned query.
        assert_eq!(o.visible_pairs(OverviewSection::Environment).len(), 1);
    }

    #[test]
    fn unprefixed_filter_applies_to_active_section_only() {
        let mut o = overview_with_data();
        o.filter.set_draft("adamw");
        o.filter.exit_edit(true);
        assert_eq!(o.active_section(), OverviewSection::Environment);
        // Environment has no match, so it filters to nothing...
        assert!(o.visible_pairs(OverviewSection::Environment).is_empty());
        // ...while inactive Config shows everything.
        assert_eq!(o.visible_pairs(OverviewSection::Config).len(), 2);

        o.cycle_section();
        assert_eq!(o.active_section(), OverviewSection::Config);
        assert_eq!(o.visible_pairs(OverviewSection::Config).len(), 1);
    }

    #[test]
    fn cursor_clamps_to_visible_rows() {
        let mut o = overview_with_data();
        o.cycle_section(); // Config
        o.move_cursor(10, 5);
        assert_eq!(o.cursor(OverviewSection::Config), 1);
        o.move_cursor(-10, 5);
        assert_eq!(o.cursor(OverviewSection::Config), 0);
    }
}
