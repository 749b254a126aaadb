//! Compiled-in table of monitored applications.
//!
//! Matching is case-insensitive substring containment against the
//! application identifier, applied uniformly at every call site.

use serde::{Deserialize, Serialize};

use crate::matcher::signatures::{
    HomeAffordance, ScreenSignature, HOME_INSTAGRAM, HOME_YOUTUBE, REELS_PLAYBACK, SHORTS_PLAYBACK,
};

/// Budget for apps without a dedicated entry of their own.
pub const DEFAULT_SCROLL_BUDGET: i64 = 500;

/// Sentinel for targets that are monitored but never tripped by index
/// deltas (raw-scroll volume can still trip them).
pub const UNBOUNDED_BUDGET: i64 = i64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppFamily {
    YouTube,
    Instagram,
    Twitter,
    Threads,
    LinkedIn,
    Facebook,
    Browser,
}

impl AppFamily {
    /// Short-form playback signature, for families that have one.
    pub fn short_form_signature(&self) -> Option<&'static ScreenSignature> {
        match self {
            AppFamily::YouTube => Some(&SHORTS_PLAYBACK),
            AppFamily::Instagram => Some(&REELS_PLAYBACK),
            _ => None,
        }
    }

    pub fn home_affordance(&self) -> Option<&'static HomeAffordance> {
        match self {
            AppFamily::YouTube => Some(&HOME_YOUTUBE),
            AppFamily::Instagram => Some(&HOME_INSTAGRAM),
            _ => None,
        }
    }

    pub fn is_browser(&self) -> bool {
        matches!(self, AppFamily::Browser)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TargetApp {
    /// Substring of the application identifier.
    pub pattern: &'static str,
    pub family: AppFamily,
    /// Whether scroll notifications from this app count toward a budget.
    pub scroll_target: bool,
    pub scroll_budget: i64,
}

static TARGETS: &[TargetApp] = &[
    TargetApp {
        pattern: "com.google.android.youtube",
        family: AppFamily::YouTube,
        scroll_target: false,
        scroll_budget: DEFAULT_SCROLL_BUDGET,
    },
    TargetApp {
        pattern: "com.instagram.android",
        family: AppFamily::Instagram,
        scroll_target: true,
        scroll_budget: 400,
    },
    TargetApp {
        pattern: "com.twitter.android",
        family: AppFamily::Twitter,
        scroll_target: true,
        scroll_budget: 250,
    },
    TargetApp {
        pattern: "com.instagram.barcelona",
        family: AppFamily::Threads,
        scroll_target: true,
        scroll_budget: UNBOUNDED_BUDGET,
    },
    TargetApp {
        pattern: "com.threads",
        family: AppFamily::Threads,
        scroll_target: true,
        scroll_budget: UNBOUNDED_BUDGET,
    },
    TargetApp {
        pattern: "com.linkedin.android",
        family: AppFamily::LinkedIn,
        scroll_target: true,
        scroll_budget: DEFAULT_SCROLL_BUDGET,
    },
    TargetApp {
        pattern: "com.facebook.katana",
        family: AppFamily::Facebook,
        scroll_target: true,
        scroll_budget: DEFAULT_SCROLL_BUDGET,
    },
    TargetApp {
        pattern: "com.android.chrome",
        family: AppFamily::Browser,
        scroll_target: false,
        scroll_budget: DEFAULT_SCROLL_BUDGET,
    },
    TargetApp {
        pattern: "org.mozilla.firefox",
        family: AppFamily::Browser,
        scroll_target: false,
        scroll_budget: DEFAULT_SCROLL_BUDGET,
    },
];

/// Look up the entry whose pattern the app identifier contains. When more
/// than one pattern matches, the most specific (longest) wins.
pub fn lookup(app_id: &str) -> Option<&'static TargetApp> {
    let lowered = app_id.to_lowercase();
    TARGETS
        .iter()
        .filter(|target| lowered.contains(target.pattern))
        .max_by_key(|target| target.pattern.len())
}

pub fn is_target(app_id: &str) -> bool {
    lookup(app_id).is_some()
}

pub fn scroll_budget_for(app_id: &str) -> i64 {
    lookup(app_id)
        .map(|target| target.scroll_budget)
        .unwrap_or(DEFAULT_SCROLL_BUDGET)
}
