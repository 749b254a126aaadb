//! Notification admission and routing.
//!
//! Each notification is processed to completion before the next; any
//! failure inside a tick is logged and the notification dropped, so one
//! bad tick never takes the stream down with it.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::EngineConfig;
use crate::intervention::{InterventionController, InterventionReason};
use crate::matcher;
use crate::platform::SnapshotSource;
use crate::registry::{self, AppFamily, TargetApp};
use crate::scroll::{BudgetState, ScrollAccumulator, ScrollSample};
use crate::settings::SettingsStore;
use crate::snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Click,
    WindowChanged,
    Scrolled,
}

/// One notification from the platform feed. Absent indices and offsets are
/// carried as `-1`, as the feed reports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiNotification {
    pub app_id: String,
    pub kind: NotificationKind,
    pub from_index: i32,
    pub to_index: i32,
    pub scroll_offset: i32,
}

impl UiNotification {
    pub fn click(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            kind: NotificationKind::Click,
            from_index: -1,
            to_index: -1,
            scroll_offset: -1,
        }
    }

    pub fn window_changed(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            kind: NotificationKind::WindowChanged,
            from_index: -1,
            to_index: -1,
            scroll_offset: -1,
        }
    }

    pub fn scrolled(
        app_id: impl Into<String>,
        from_index: i32,
        to_index: i32,
        scroll_offset: i32,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            kind: NotificationKind::Scrolled,
            from_index,
            to_index,
            scroll_offset,
        }
    }

    fn sample(&self) -> ScrollSample {
        ScrollSample {
            from_index: self.from_index,
            to_index: self.to_index,
            offset: self.scroll_offset,
        }
    }
}

/// Filters notifications down to monitored apps and routes them to the
/// pattern matcher and the scroll accumulator.
pub struct EventDispatcher {
    snapshots: Arc<dyn SnapshotSource>,
    settings: Arc<SettingsStore>,
    accumulator: Arc<Mutex<ScrollAccumulator>>,
    intervention: InterventionController,
    config: Arc<EngineConfig>,
}

impl EventDispatcher {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        settings: Arc<SettingsStore>,
        accumulator: Arc<Mutex<ScrollAccumulator>>,
        intervention: InterventionController,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            snapshots,
            settings,
            accumulator,
            intervention,
            config,
        }
    }

    /// Process one notification. This is the tick error boundary: failures
    /// are logged here and never propagate to the caller.
    pub async fn dispatch(&self, notification: &UiNotification) {
        if let Err(err) = self.process(notification).await {
            error!(
                "failed to process {:?} notification from {}: {err:#}",
                notification.kind, notification.app_id
            );
        }
    }

    async fn process(&self, notification: &UiNotification) -> Result<()> {
        let Some(target) = registry::lookup(&notification.app_id) else {
            return Ok(());
        };

        let now = Utc::now();
        match notification.kind {
            NotificationKind::Click => {
                self.handle_screen_event(notification, target, now).await?;
                self.handle_scroll_event(notification, target).await?;
            }
            NotificationKind::WindowChanged => {
                self.handle_screen_event(notification, target, now).await?;
            }
            NotificationKind::Scrolled => {
                self.handle_scroll_event(notification, target).await?;
            }
        }
        Ok(())
    }

    /// Click / window-change routing: window-reset bookkeeping, an
    /// already-tripped budget, and the short-form screen checks.
    async fn handle_screen_event(
        &self,
        notification: &UiNotification,
        target: &TargetApp,
        now: chrono::DateTime<Utc>,
    ) -> Result<()> {
        let budget_tripped = {
            let mut accumulator = self.accumulator.lock().await;
            accumulator.reset_if_stale(&notification.app_id, now);
            target.scroll_target
                && self.settings.scroll_limit_enabled()
                && accumulator.current_state(&notification.app_id, now) == BudgetState::Exceeded
        };
        if budget_tripped {
            self.intervention
                .intervene(InterventionReason::BudgetExceeded {
                    app_id: notification.app_id.clone(),
                })
                .await;
        }

        if self.settings.block_enabled() {
            if let Some(signature) = target.family.short_form_signature() {
                // Fetched fresh: the screen may have changed since the
                // notification was queued.
                match self.snapshots.snapshot() {
                    None => debug!("no snapshot available; skipping short-form check"),
                    Some(tree) => {
                        snapshot::dump_hierarchy(&tree);
                        if matcher::matches_short_form(&tree, signature) {
                            let reason = InterventionReason::ShortFormDetected {
                                family: target.family,
                            };
                            if notification.kind == NotificationKind::Click {
                                // A click may still be mid-transition;
                                // re-check shortly instead of acting on it.
                                self.intervention
                                    .intervene_after(reason, self.config.click_recheck_delay_ms);
                            } else {
                                self.intervention.intervene(reason).await;
                            }
                        }
                    }
                }
            }
        }

        if target.family.is_browser() && self.settings.web_block_enabled() {
            match self.snapshots.snapshot() {
                None => debug!("no snapshot available; skipping web content check"),
                Some(tree) => {
                    if matcher::matches_blocked_web_content(&tree) {
                        self.intervention
                            .intervene(InterventionReason::BlockedWebContent)
                            .await;
                    }
                }
            }
        }

        Ok(())
    }

    /// Scroll / click accumulation toward the app's budget.
    async fn handle_scroll_event(
        &self,
        notification: &UiNotification,
        target: &TargetApp,
    ) -> Result<()> {
        if !target.scroll_target || !self.settings.scroll_limit_enabled() {
            return Ok(());
        }

        // Instagram mixes short-form content with ordinary posts; scroll
        // inside a recognized post view does not count.
        let on_feed_post = if target.family == AppFamily::Instagram {
            self.snapshots
                .snapshot()
                .map(|tree| matcher::matches_feed_post(&tree))
                .unwrap_or(false)
        } else {
            false
        };

        let sample = notification.sample();
        let state = {
            let mut accumulator = self.accumulator.lock().await;
            accumulator.observe(&notification.app_id, &sample, on_feed_post, Utc::now())
        };

        if state == BudgetState::Exceeded {
            let reason = InterventionReason::BudgetExceeded {
                app_id: notification.app_id.clone(),
            };
            if sample.mid_gesture() {
                // Don't fight an in-progress fling; settle first.
                self.intervention
                    .intervene_after(reason, self.config.gesture_settle_delay_ms);
            } else {
                self.intervention.intervene(reason).await;
            }
        }

        Ok(())
    }

    pub(crate) fn snapshots(&self) -> &Arc<dyn SnapshotSource> {
        &self.snapshots
    }
}
