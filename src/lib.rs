//! Watches the foreground application's UI tree and intervenes when the
//! user lands on short-form video content or exceeds a per-app scroll
//! budget, by simulating back/home navigation through the host platform.
//!
//! The host supplies snapshots and navigation primitives via the traits in
//! [`platform`]; everything else — classification, accumulation, and the
//! intervention state machine — lives here.

pub mod config;
pub mod dispatch;
pub mod intervention;
pub mod matcher;
pub mod monitor;
pub mod platform;
pub mod registry;
pub mod scroll;
pub mod settings;
pub mod snapshot;
pub mod utils;

#[cfg(test)]
pub(crate) mod testutil;

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::config::EngineConfig;
use crate::dispatch::{EventDispatcher, UiNotification};
use crate::intervention::InterventionController;
use crate::monitor::MonitorController;
use crate::platform::{Navigator, SnapshotSource};
use crate::scroll::ScrollAccumulator;
use crate::settings::SettingsStore;

/// Initialize logging (reads `RUST_LOG`, defaults to info).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// Wires the dispatcher, accumulator, intervention controller, and
/// periodic monitor together. Hosts push notifications in through
/// [`Engine::handle_notification`] and start the monitor for the pull
/// path.
pub struct Engine {
    dispatcher: Arc<EventDispatcher>,
    intervention: InterventionController,
    monitor: Mutex<MonitorController>,
    config: Arc<EngineConfig>,
}

impl Engine {
    pub fn new(
        snapshots: Arc<dyn SnapshotSource>,
        navigator: Arc<dyn Navigator>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self::with_config(snapshots, navigator, settings, EngineConfig::default())
    }

    pub fn with_config(
        snapshots: Arc<dyn SnapshotSource>,
        navigator: Arc<dyn Navigator>,
        settings: Arc<SettingsStore>,
        config: EngineConfig,
    ) -> Self {
        let config = Arc::new(config);
        let accumulator = Arc::new(Mutex::new(ScrollAccumulator::new(&config)));
        let intervention = InterventionController::new(
            snapshots.clone(),
            navigator,
            settings.clone(),
            accumulator.clone(),
            config.clone(),
        );
        let dispatcher = Arc::new(EventDispatcher::new(
            snapshots,
            settings,
            accumulator,
            intervention.clone(),
            config.clone(),
        ));

        Self {
            dispatcher,
            intervention,
            monitor: Mutex::new(MonitorController::new()),
            config,
        }
    }

    /// Feed one platform notification through classification and routing.
    pub async fn handle_notification(&self, notification: &UiNotification) {
        self.dispatcher.dispatch(notification).await;
    }

    /// Start the periodic pull-based inspection loop.
    pub async fn start_monitor(&self) -> Result<()> {
        self.monitor
            .lock()
            .await
            .start(self.dispatcher.clone(), self.config.clone())
    }

    pub async fn stop_monitor(&self) -> Result<()> {
        self.monitor.lock().await.stop().await
    }

    pub fn last_intervention_at(&self) -> Option<DateTime<Utc>> {
        self.intervention.last_intervention_at()
    }
}
