//! Per-app scroll accumulation over a rolling window.
//!
//! The platform's scroll telemetry is inconsistent across apps: index
//! ranges are precise when present, the raw pixel offset is the best
//! fallback, and some notifications carry neither. Three accumulation
//! paths keep forward progress tracked under any of the three shapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::EngineConfig;
use crate::registry::{self, AppFamily};

/// Raw scroll offset value meaning "no usable reading"; also reported by
/// the platform while a fling gesture is still in progress.
pub const GESTURE_IN_PROGRESS: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetState {
    WithinBudget,
    Exceeded,
}

/// Scroll telemetry extracted from one notification.
#[derive(Debug, Clone, Copy)]
pub struct ScrollSample {
    pub from_index: i32,
    pub to_index: i32,
    pub offset: i32,
}

impl ScrollSample {
    pub fn has_index_range(&self) -> bool {
        self.from_index >= 0 && self.to_index >= 0
    }

    pub fn mid_gesture(&self) -> bool {
        self.offset == GESTURE_IN_PROGRESS
    }
}

/// Mutable window state for one app family.
#[derive(Debug, Clone)]
pub struct ScrollWindow {
    pub index_delta: i64,
    pub raw_scroll: i64,
    pub window_started_at: DateTime<Utc>,
    /// One-way trigger: stays set until the window resets, regardless of
    /// what the counters do afterwards.
    pub tripped: bool,
}

impl ScrollWindow {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            index_delta: 0,
            raw_scroll: 0,
            window_started_at: now,
            tripped: false,
        }
    }

    fn reset(&mut self, now: DateTime<Utc>) {
        self.index_delta = 0;
        self.raw_scroll = 0;
        self.window_started_at = now;
        self.tripped = false;
    }
}

/// Sums scroll magnitude per app family and raises `Exceeded` once a
/// window's budget is spent. State lives in memory only.
pub struct ScrollAccumulator {
    windows: HashMap<AppFamily, ScrollWindow>,
    window_reset_secs: i64,
    raw_scroll_limit: i64,
}

impl ScrollAccumulator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            windows: HashMap::new(),
            window_reset_secs: config.window_reset_secs,
            raw_scroll_limit: config.raw_scroll_limit,
        }
    }

    /// Apply one notification's scroll telemetry and report the window
    /// state. `on_feed_post` is the caller's classification of the current
    /// screen; index-based scroll inside a recognized post view is free.
    pub fn observe(
        &mut self,
        app_id: &str,
        sample: &ScrollSample,
        on_feed_post: bool,
        now: DateTime<Utc>,
    ) -> BudgetState {
        let Some(target) = registry::lookup(app_id) else {
            return BudgetState::WithinBudget;
        };
        if !target.scroll_target {
            return BudgetState::WithinBudget;
        }

        let budget = target.scroll_budget;
        let family = target.family;
        let reset_secs = self.window_reset_secs;
        let raw_limit = self.raw_scroll_limit;

        let window = self
            .windows
            .entry(family)
            .or_insert_with(|| ScrollWindow::new(now));
        reset_window_if_stale(window, reset_secs, now);

        if sample.has_index_range() {
            let delta = i64::from(sample.to_index - sample.from_index);
            if family == AppFamily::Instagram && on_feed_post {
                // Browsing an actual post is not penalized.
            } else {
                window.index_delta += delta;
            }
            debug!("index scroll for {app_id}: total {}", window.index_delta);
        } else if sample.offset > 0 {
            window.raw_scroll += i64::from(sample.offset);
            debug!("raw scroll for {app_id}: total {}", window.raw_scroll);
        } else {
            // Neither signal usable: malformed input still costs one unit.
            window.index_delta += 1;
            debug!("unusable scroll telemetry for {app_id}; counted one unit");
        }

        if window.tripped || window.index_delta > budget || window.raw_scroll > raw_limit {
            if !window.tripped {
                info!(
                    "scroll budget exceeded for {app_id}: index {} / {}, raw {} / {}",
                    window.index_delta, budget, window.raw_scroll, raw_limit
                );
            }
            window.tripped = true;
            BudgetState::Exceeded
        } else {
            BudgetState::WithinBudget
        }
    }

    /// Window-reset check alone, for notification kinds that should not
    /// add scroll but must still observe the passage of time.
    pub fn reset_if_stale(&mut self, app_id: &str, now: DateTime<Utc>) {
        let Some(target) = registry::lookup(app_id) else {
            return;
        };
        if let Some(window) = self.windows.get_mut(&target.family) {
            reset_window_if_stale(window, self.window_reset_secs, now);
        }
    }

    /// Current window state without applying a new sample. Performs the
    /// reset check first so a stale latch cannot outlive its window.
    pub fn current_state(&mut self, app_id: &str, now: DateTime<Utc>) -> BudgetState {
        self.reset_if_stale(app_id, now);
        let tripped = registry::lookup(app_id)
            .and_then(|target| self.windows.get(&target.family))
            .map(|window| window.tripped)
            .unwrap_or(false);
        if tripped {
            BudgetState::Exceeded
        } else {
            BudgetState::WithinBudget
        }
    }

    #[cfg(test)]
    pub(crate) fn window(&self, family: AppFamily) -> Option<&ScrollWindow> {
        self.windows.get(&family)
    }
}

fn reset_window_if_stale(window: &mut ScrollWindow, reset_secs: i64, now: DateTime<Utc>) {
    if (now - window.window_started_at).num_seconds() >= reset_secs {
        window.reset(now);
        info!("scroll window reset after {reset_secs}s");
    }
}
