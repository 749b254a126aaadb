/// How a tripped scroll budget is corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStyle {
    /// Two consecutive back navigations. A single back often lands on an
    /// intermediate overlay rather than the previous screen.
    BackNavigation,
    /// Jump straight to the launcher.
    HomeNavigation,
}

/// Engine tuning constants. These are defaults, not semantics — hosts may
/// override any of them.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pull-based inspection cadence.
    pub poll_interval_secs: u64,

    /// A single poll tick slower than this is abandoned.
    pub poll_timeout_secs: u64,

    /// Scroll window lifetime; counters and latch reset when it elapses.
    pub window_reset_secs: i64,

    /// Global ceiling for the raw-offset fallback counter.
    pub raw_scroll_limit: i64,

    /// Re-check delay after a click-triggered short-form detection.
    pub click_recheck_delay_ms: u64,

    /// Deferral before correcting a budget trip that arrived mid-gesture.
    pub gesture_settle_delay_ms: u64,

    /// Cadence of the browser re-check loop.
    pub web_recheck_interval_ms: u64,

    pub budget_correction: CorrectionStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            poll_timeout_secs: 10,
            window_reset_secs: 5 * 60,
            raw_scroll_limit: 40_200,
            click_recheck_delay_ms: 250,
            gesture_settle_delay_ms: 2_000,
            web_recheck_interval_ms: 1_000,
            budget_correction: CorrectionStyle::BackNavigation,
        }
    }
}
