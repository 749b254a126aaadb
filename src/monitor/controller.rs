use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::dispatch::EventDispatcher;

use super::loop_worker::poll_loop;

/// Owns the periodic inspection task. The push-based notification feed is
/// the primary channel; this loop catches content changes it missed.
pub struct MonitorController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(
        &mut self,
        dispatcher: Arc<EventDispatcher>,
        config: Arc<EngineConfig>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("monitor already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(poll_loop(dispatcher, config, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("periodic monitor started");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("monitor loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::InterventionController;
    use crate::scroll::ScrollAccumulator;
    use crate::testutil::{settings_in, MockSource, RecordingNavigator};
    use tokio::sync::Mutex;

    fn dispatcher_with(
        source: Arc<MockSource>,
        navigator: Arc<RecordingNavigator>,
        dir: &tempfile::TempDir,
    ) -> (Arc<EventDispatcher>, Arc<EngineConfig>) {
        let settings = settings_in(dir);
        let config = Arc::new(EngineConfig::default());
        let accumulator = Arc::new(Mutex::new(ScrollAccumulator::new(&config)));
        let intervention = InterventionController::new(
            source.clone(),
            navigator.clone(),
            settings.clone(),
            accumulator.clone(),
            config.clone(),
        );
        let dispatcher = Arc::new(EventDispatcher::new(
            source,
            settings,
            accumulator,
            intervention,
            config.clone(),
        ));
        (dispatcher, config)
    }

    #[tokio::test]
    async fn starting_twice_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(MockSource::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let (dispatcher, config) = dispatcher_with(source, navigator, &dir);

        let mut monitor = MonitorController::new();
        assert!(!monitor.is_running());

        monitor.start(dispatcher.clone(), config.clone()).unwrap();
        assert!(monitor.is_running());
        assert!(monitor.start(dispatcher, config).is_err());

        monitor.stop().await.unwrap();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn stop_without_start_is_a_no_op() {
        let mut monitor = MonitorController::new();
        monitor.stop().await.unwrap();
    }
}
