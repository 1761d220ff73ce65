//! Connection loss supervision
//!
//! Without a working network link the device cannot receive new commands.
//! After a grace window it goes dark rather than keep showing a stale color.
//! When the link comes back, and right after boot, a short hold-off keeps the
//! strips dark until the network layer had a chance to deliver the retained
//! commands.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::input::Connectivity;

/// Timing of the fail-safe path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailSafeConfig {
    /// How long the link may be down before the strips are forced dark
    pub connection_timeout: Duration,
    /// How long to stay dark after boot and after a lost link returns
    pub reconnect_hold_off: Duration,
}

impl Default for FailSafeConfig {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(60),
            reconnect_hold_off: Duration::from_secs(4),
        }
    }
}

/// Verdict of the supervisor for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Supervision {
    /// Render the effects
    #[default]
    Normal,
    /// Waiting for retained commands; render black
    HoldOff,
    /// Link down beyond the grace window; render black
    ConnectionLost,
}

impl Supervision {
    /// Whether effect evaluation is bypassed for a fade to black
    pub const fn forces_black(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Tracks link state across frames
#[derive(Debug, Clone)]
pub struct ConnectionSupervisor {
    config: FailSafeConfig,
    started: bool,
    down_since: Option<Instant>,
    hold_off_since: Option<Instant>,
    state: Supervision,
}

impl ConnectionSupervisor {
    pub const fn new(config: FailSafeConfig) -> Self {
        Self {
            config,
            started: false,
            down_since: None,
            hold_off_since: None,
            state: Supervision::Normal,
        }
    }

    /// Update with the current link state
    pub fn check(&mut self, connectivity: Connectivity, now: Instant) -> Supervision {
        if !self.started {
            self.started = true;
            self.hold_off_since = Some(now);
        }

        let state = if connectivity.is_up() {
            self.down_since = None;
            if self.state == Supervision::ConnectionLost {
                #[cfg(feature = "esp32-log")]
                println!("[ConnectionSupervisor.check] connection restored");
                self.hold_off_since = Some(now);
            }
            self.hold_off_state(now)
        } else {
            let down_since = *self.down_since.get_or_insert(now);
            if now.saturating_duration_since(down_since) >= self.config.connection_timeout {
                #[cfg(feature = "esp32-log")]
                if self.state != Supervision::ConnectionLost {
                    println!("[ConnectionSupervisor.check] connection lost, forcing black");
                }
                Supervision::ConnectionLost
            } else {
                self.hold_off_state(now)
            }
        };

        self.state = state;
        state
    }

    fn hold_off_state(&mut self, now: Instant) -> Supervision {
        match self.hold_off_since {
            Some(since)
                if now.saturating_duration_since(since) < self.config.reconnect_hold_off =>
            {
                Supervision::HoldOff
            }
            _ => {
                self.hold_off_since = None;
                Supervision::Normal
            }
        }
    }

    /// Verdict of the last check
    pub const fn state(&self) -> Supervision {
        self.state
    }

    pub const fn config(&self) -> &FailSafeConfig {
        &self.config
    }
}
