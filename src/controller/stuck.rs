use crate::config::GeneralConfig;
use std::time::{Duration, Instant};

/// Decides when a run that has finished every step of its sequence, without
/// the game moving to the next one, should repeat the last step.
pub trait StuckPolicy: Send {
    fn name(&self) -> &'static str;

    fn should_refresh(&mut self, waiting_since: Instant, now: Instant) -> bool;
}

/// Wait for the game indefinitely
#[derive(Debug, Default)]
pub struct NeverRefresh;

impl StuckPolicy for NeverRefresh {
    fn name(&self) -> &'static str {
        "never"
    }

    fn should_refresh(&mut self, _waiting_since: Instant, _now: Instant) -> bool {
        false
    }
}

/// Repeat the last step after a fixed idle period
#[derive(Debug)]
pub struct RefreshAfterDelay {
    delay: Duration,
}

impl RefreshAfterDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl StuckPolicy for RefreshAfterDelay {
    fn name(&self) -> &'static str {
        "refresh-after-delay"
    }

    fn should_refresh(&mut self, waiting_since: Instant, now: Instant) -> bool {
        now.saturating_duration_since(waiting_since) >= self.delay
    }
}

pub fn stuck_policy_from_config(general: &GeneralConfig) -> Box<dyn StuckPolicy> {
    if general.auto_step_refresh_enabled {
        Box::new(RefreshAfterDelay::new(Duration::from_secs(
            general.auto_step_refresh_delay_seconds,
        )))
    } else {
        Box::new(NeverRefresh)
    }
}
