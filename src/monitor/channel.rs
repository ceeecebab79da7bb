use std::time::{Duration, Instant};

/// Debounce state of one alert channel. The confirmation deadline lives in
/// the `Pending` variant, so "active but no timer and not yet fired" cannot
/// be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Pending { deadline: Instant },
    Fired,
}

/// One independently debounced alert condition.
///
/// `observe` applies a freshly derived signal: arming is edge-triggered
/// (false -> true), a reverted signal cancels whatever is outstanding.
/// `poll` is the only firing path; it stands in for the deferred action and
/// runs on every loop iteration whether or not a signal update happened.
pub struct AlertChannel {
    label: &'static str,
    state: ChannelState,
}

impl AlertChannel {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: ChannelState::Idle,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ChannelState::Idle)
    }

    pub fn observe(&mut self, signal: bool, confirm_delay: Duration, now: Instant) {
        match (self.state, signal) {
            (ChannelState::Idle, true) => {
                self.state = ChannelState::Pending {
                    deadline: now + confirm_delay,
                };
                tracing::debug!(
                    channel = self.label,
                    delay_ms = confirm_delay.as_millis() as u64,
                    "alert condition raised, confirmation armed"
                );
            }
            (ChannelState::Pending { .. } | ChannelState::Fired, false) => {
                self.state = ChannelState::Idle;
                tracing::debug!(channel = self.label, "alert condition cleared");
            }
            // already pending or fired: re-observing the same condition
            // neither re-arms nor duplicates
            _ => {}
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if let ChannelState::Pending { deadline } = self.state {
            if now >= deadline {
                self.state = ChannelState::Fired;
                tracing::info!(channel = self.label, "alert confirmed");
                return true;
            }
        }
        false
    }

    pub fn reset(&mut self) {
        self.state = ChannelState::Idle;
    }
}
