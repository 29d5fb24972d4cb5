//! Sidebar open/close animation.
//!
//! Time-based ease-out cubic between zero and the configured expanded
//! width. `toggle` reverses direction mid-flight from the current width, so
//! mashing the key never snaps the panel.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimPhase {
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

#[derive(Debug, Clone)]
pub struct AnimationState {
    phase: AnimPhase,
    expanded_width: u16,
    duration: Duration,
    /// Animation start and the width it launched from.
    started: Option<(Instant, f64)>,
    current_width: f64,
}

impl AnimationState {
    pub fn new(expanded_width: u16, duration: Duration, visible: bool) -> Self {
        Self {
            phase: if visible {
                AnimPhase::Expanded
            } else {
                AnimPhase::Collapsed
            },
            expanded_width,
            duration,
            started: None,
            current_width: if visible { expanded_width as f64 } else { 0.0 },
        }
    }

    pub fn phase(&self) -> AnimPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, AnimPhase::Expanding | AnimPhase::Collapsing)
    }

    pub fn is_visible(&self) -> bool {
        self.current_width() > 0
    }

    pub fn current_width(&self) -> u16 {
        self.current_width.round() as u16
    }

    pub fn expanded_width(&self) -> u16 {
        self.expanded_width
    }

    /// Reverse direction. Starts a fresh ease from the current width.
    pub fn toggle(&mut self, now: Instant) {
        self.phase = match self.phase {
            AnimPhase::Collapsed | AnimPhase::Collapsing => AnimPhase::Expanding,
            AnimPhase::Expanded | AnimPhase::Expanding => AnimPhase::Collapsing,
        };
        self.started = Some((now, self.current_width));
    }

    /// Advance to `now`. Returns true when the target was reached and the
    /// state settled into `Expanded`/`Collapsed` on this call.
    pub fn update(&mut self, now: Instant) -> bool {
        let target = match self.phase {
            AnimPhase::Expanding => self.expanded_width as f64,
            AnimPhase::Collapsing => 0.0,
            AnimPhase::Expanded | AnimPhase::Collapsed => return false,
        };
        let Some((start, from)) = self.started else {
            // Never armed; settle immediately.
            self.current_width = target;
            self.settle();
            return true;
        };
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (now.saturating_duration_since(start).as_secs_f64() / self.duration.as_secs_f64())
                .min(1.0)
        };
        let eased = 1.0 - (1.0 - t).powi(3);
        self.current_width = from + (target - from) * eased;
        if t >= 1.0 {
            self.current_width = target;
            self.settle();
            self.started = None;
            return true;
        }
        false
    }

    fn settle(&mut self) {
        self.phase = if self.current_width > 0.0 {
            AnimPhase::Expanded
        } else {
            AnimPhase::Collapsed
        };
    }

    /// Snap immediately only when stably expanded; otherwise just retarget
    /// future animations.
    pub fn set_expanded_width(&mut self, width: u16) {
        let was_stable_expanded = self.phase == AnimPhase::Expanded;
        self.expanded_width = width;
        if was_stable_expanded {
            self.current_width = width as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_expands_then_collapses() {
        let t0 = Instant::now();
        let mut a = AnimationState::new(30, Duration::from_millis(100), false);
        assert_eq!(a.phase(), AnimPhase::Collapsed);

        a.toggle(t0);
        assert_eq!(a.phase(), AnimPhase::Expanding);
        assert!(!a.update(t0 + Duration::from_millis(50)));
        let halfway = a.current_width();
        assert!(halfway > 0 && halfway < 30, "mid-flight width {halfway}");

        assert!(a.update(t0 + Duration::from_millis(100)));
        assert_eq!(a.phase(), AnimPhase::Expanded);
        assert_eq!(a.current_width(), 30);

        a.toggle(t0 + Duration::from_millis(200));
        assert!(a.update(t0 + Duration::from_millis(300)));
        assert_eq!(a.phase(), AnimPhase::Collapsed);
        assert_eq!(a.current_width(), 0);
    }

    #[test]
    fn mid_flight_toggle_reverses_from_current_width() {
        let t0 = Instant::now();
        let mut a = AnimationState::new(40, Duration::from_millis(100), false);
        a.toggle(t0);
        a.update(t0 + Duration::from_millis(60));
        let mid = a.current_width();
        assert!(mid > 0);

        a.toggle(t0 + Duration::from_millis(60));
        assert_eq!(a.phase(), AnimPhase::Collapsing);
        // Immediately after the reverse, width has not jumped.
        a.update(t0 + Duration::from_millis(61));
        assert!(a.current_width() <= mid);
        assert!(a.current_width() >= mid.saturating_sub(5));
    }

    #[test]
    fn ease_out_front_loads_motion() {
        let t0 = Instant::now();
        let mut a = AnimationState::new(100, Duration::from_millis(100), false);
        a.toggle(t0);
        a.update(t0 + Duration::from_millis(50));
        // Ease-out cubic covers 87.5% of the distance in the first half.
        assert!(a.current_width() > 80, "got {}", a.current_width());
    }

    #[test]
    fn set_expanded_width_snaps_only_when_stably_expanded() {
        let t0 = Instant::now();
        let mut a = AnimationState::new(30, Duration::from_millis(100), true);
        a.set_expanded_width(45);
        assert_eq!(a.current_width(), 45, "stable expanded snaps");

        let mut b = AnimationState::new(30, Duration::from_millis(100), false);
        b.toggle(t0);
        b.set_expanded_width(45);
        assert!(b.current_width() < 45, "mid-animation only retargets");
        assert!(b.update(t0 + Duration::from_millis(100)));
        assert_eq!(b.current_width(), 45);
    }
}
