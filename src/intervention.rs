//! Corrective navigation with debouncing.
//!
//! One correction is in flight at a time. Deferred corrections re-check
//! their trigger against current state when they fire, so a stale trigger
//! (window reset, app switch, screen already left) becomes a no-op instead
//! of a wrong navigation.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::config::{CorrectionStyle, EngineConfig};
use crate::matcher;
use crate::platform::{Navigator, SnapshotSource};
use crate::registry::AppFamily;
use crate::scroll::{BudgetState, ScrollAccumulator};
use crate::settings::SettingsStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterventionReason {
    ShortFormDetected { family: AppFamily },
    BudgetExceeded { app_id: String },
    BlockedWebContent,
}

#[derive(Debug, Default)]
struct CooldownState {
    in_flight: bool,
    last_intervention_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct InterventionController {
    snapshots: Arc<dyn SnapshotSource>,
    navigator: Arc<dyn Navigator>,
    settings: Arc<SettingsStore>,
    accumulator: Arc<Mutex<ScrollAccumulator>>,
    state: Arc<StdMutex<CooldownState>>,
    config: Arc<EngineConfig>,
}

impl InterventionController {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        navigator: Arc<dyn Navigator>,
        settings: Arc<SettingsStore>,
        accumulator: Arc<Mutex<ScrollAccumulator>>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            snapshots,
            navigator,
            settings,
            accumulator,
            state: Arc::new(StdMutex::new(CooldownState::default())),
            config,
        }
    }

    /// Correct immediately. Blocked-web-content triggers instead enter the
    /// re-check loop, which keeps navigating back until the content is gone.
    pub async fn intervene(&self, reason: InterventionReason) {
        if !self.begin() {
            debug!("intervention already in flight; trigger suppressed");
            return;
        }

        match reason {
            InterventionReason::BlockedWebContent => self.spawn_web_recheck_loop(),
            other => {
                self.execute(&other);
                self.finish();
            }
        }
    }

    /// Correct after a delay, re-validating the trigger at fire time.
    pub fn intervene_after(&self, reason: InterventionReason, delay_ms: u64) {
        if !self.begin() {
            debug!("intervention already in flight; deferred trigger suppressed");
            return;
        }

        let controller = self.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            if controller.still_applies(&reason).await {
                controller.execute(&reason);
            } else {
                debug!("deferred intervention no longer applies; skipping");
            }
            controller.finish();
        });
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().unwrap().in_flight
    }

    pub fn last_intervention_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().unwrap().last_intervention_at
    }

    fn begin(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.in_flight {
            return false;
        }
        state.in_flight = true;
        true
    }

    fn finish(&self) {
        self.state.lock().unwrap().in_flight = false;
    }

    /// Re-evaluate the detection predicate against current state.
    async fn still_applies(&self, reason: &InterventionReason) -> bool {
        match reason {
            InterventionReason::ShortFormDetected { family } => {
                let Some(signature) = family.short_form_signature() else {
                    return false;
                };
                self.snapshots
                    .snapshot()
                    .map(|tree| matcher::matches_short_form(&tree, signature))
                    .unwrap_or(false)
            }
            InterventionReason::BudgetExceeded { app_id } => {
                let mut accumulator = self.accumulator.lock().await;
                accumulator.current_state(app_id, Utc::now()) == BudgetState::Exceeded
            }
            InterventionReason::BlockedWebContent => self
                .snapshots
                .snapshot()
                .map(|tree| matcher::matches_blocked_web_content(&tree))
                .unwrap_or(false),
        }
    }

    fn execute(&self, reason: &InterventionReason) {
        match reason {
            InterventionReason::ShortFormDetected { family } => {
                self.correct_short_form(*family);
            }
            InterventionReason::BudgetExceeded { app_id } => {
                info!("scroll budget correction for {app_id}");
                match self.config.budget_correction {
                    CorrectionStyle::BackNavigation => self.generic_correction(),
                    CorrectionStyle::HomeNavigation => self.navigator.global_home(),
                }
                self.record_intervention();
            }
            InterventionReason::BlockedWebContent => {
                self.navigator.global_back();
                self.record_intervention();
            }
        }
    }

    /// Targeted correction first: activate the family's home affordance.
    /// Falls back to the generic correction when the affordance is absent
    /// or rejects the action.
    fn correct_short_form(&self, family: AppFamily) {
        if let Some(tree) = self.snapshots.snapshot() {
            if let Some(home) = matcher::find_home_affordance(&tree, family) {
                if self.navigator.activate(home.id) {
                    info!("short-form screen corrected via home affordance");
                    self.record_intervention();
                    return;
                }
                warn!("home affordance rejected activation; falling back");
            } else {
                debug!("home affordance not found; falling back");
            }
        }

        self.generic_correction();
        self.record_intervention();
    }

    /// Back twice: a single back often lands on an intermediate overlay.
    fn generic_correction(&self) {
        self.navigator.global_back();
        self.navigator.global_back();
        info!("generic back-navigation correction issued");
    }

    /// Keep navigating back while the blocked content is still on screen.
    /// Exits when the content is gone or the web-block flag is turned off.
    fn spawn_web_recheck_loop(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            let interval = Duration::from_millis(controller.config.web_recheck_interval_ms);
            loop {
                if !controller.settings.web_block_enabled() {
                    debug!("web block disabled; leaving re-check loop");
                    break;
                }
                let still_blocked = controller
                    .snapshots
                    .snapshot()
                    .map(|tree| matcher::matches_blocked_web_content(&tree))
                    .unwrap_or(false);
                if !still_blocked {
                    info!("blocked web content cleared");
                    break;
                }
                controller.navigator.global_back();
                controller.record_intervention();
                sleep(interval).await;
            }
            controller.finish();
        });
    }

    fn record_intervention(&self) {
        let now = Utc::now();
        self.state.lock().unwrap().last_intervention_at = Some(now);
        if let Err(err) = self.settings.set_last_intervention_ms(now.timestamp_millis()) {
            warn!("failed to persist intervention timestamp: {err:#}");
        }
    }
}
