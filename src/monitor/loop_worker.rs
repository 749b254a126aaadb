use std::sync::Arc;

use anyhow::Result;
use tokio::time::{interval, timeout, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::dispatch::{EventDispatcher, UiNotification};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Periodic pull-based inspection of the foreground app.
///
/// `MissedTickBehavior::Delay` makes a slow inspection push the next tick
/// back instead of letting ticks pile up, so at most one inspection runs
/// at a time.
pub(crate) async fn poll_loop(
    dispatcher: Arc<EventDispatcher>,
    config: Arc<EngineConfig>,
    cancel_token: CancellationToken,
) {
    let mut ticker = interval(Duration::from_secs(config.poll_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = perform_inspection(&dispatcher);
                match timeout(Duration::from_secs(config.poll_timeout_secs), fut).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log_warn!("periodic inspection failed: {err:?}"),
                    Err(_) => log_warn!(
                        "periodic inspection timeout (> {}s)",
                        config.poll_timeout_secs
                    ),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("monitor loop shutting down");
                break;
            }
        }
    }
}

/// One inspection tick: read the foreground app and push a synthesized
/// window-change through the normal dispatch path, so the pull channel
/// reuses the push channel's routing and error boundary.
async fn perform_inspection(dispatcher: &Arc<EventDispatcher>) -> Result<()> {
    let Some(app_id) = dispatcher.snapshots().foreground_app() else {
        log_debug!("foreground app unknown; nothing to inspect");
        return Ok(());
    };

    dispatcher
        .dispatch(&UiNotification::window_changed(app_id))
        .await;
    Ok(())
}
