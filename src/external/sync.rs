//! Periodic housekeeping against sibling plugins and the game, driven by the
//! host's tick rather than by frame-event subscriptions.

use crate::external::services::Services;
use std::time::{Duration, Instant};
use tracing::debug;

/// Label the dialogue plugin shows while we hold external control
pub const DIALOGUE_CONTROL_LABEL: &str = "questline";

/// Hands dialogue skipping to the dialogue automation plugin while a run is
/// active, and gives it back afterwards.
#[derive(Debug, Default)]
pub struct DialogueAutomationSync {
    holding_control: bool,
}

impl DialogueAutomationSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_holding_control(&self) -> bool {
        self.holding_control
    }

    pub fn tick(&mut self, automation_running: bool, enabled: bool, services: &Services) {
        let want_control = automation_running && enabled;
        if want_control == self.holding_control {
            return;
        }

        let dialogue = &services.dialogue;
        if want_control {
            match services.optional(dialogue.is_in_external_control()) {
                Some(true) => {
                    debug!("Dialogue automation is already under external control");
                }
                Some(false) => {
                    let enabled =
                        services.optional(dialogue.enable_external_control(DIALOGUE_CONTROL_LABEL));
                    if enabled == Some(true) {
                        debug!("Took external control of dialogue automation");
                        self.holding_control = true;
                    }
                }
                None => {}
            }
        } else {
            self.release(services);
        }
    }

    /// Give control back if we hold it
    pub fn release(&mut self, services: &Services) {
        if !self.holding_control {
            return;
        }
        self.holding_control = false;
        if services
            .optional(services.dialogue.disable_external_control(DIALOGUE_CONTROL_LABEL))
            .is_some()
        {
            debug!("Released external control of dialogue automation");
        }
    }
}

/// Keeps the next interaction target highlighted, refreshing at a fixed
/// interval and clearing the highlight while the character is busy.
#[derive(Debug)]
pub struct HighlightTracker {
    interval: Duration,
    last_run: Option<Instant>,
    highlighted: Option<u32>,
}

impl HighlightTracker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            highlighted: None,
        }
    }

    pub fn highlighted(&self) -> Option<u32> {
        self.highlighted
    }

    /// Returns true when the highlight was refreshed this tick
    pub fn tick(&mut self, now: Instant, target: Option<u32>, services: &Services) -> bool {
        if let Some(last_run) = self.last_run
            && now.duration_since(last_run) < self.interval
        {
            return false;
        }
        self.last_run = Some(now);

        let target = if services.game.is_occupied() {
            None
        } else {
            target
        };
        services.actions.highlight_object(target);
        self.highlighted = target;
        true
    }
}
