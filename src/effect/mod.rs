//! Effect state machines
//!
//! Two tiers of effects drive the fade engine:
//!
//! - [`MultiStripController`] picks a global mode from the inputs (alarm,
//!   motion, single-strip effects, idle) and renders it on both strips.
//! - [`SingleStripPlayer`] runs the effect selected for one strip while the
//!   global mode is [`MultiMode::SingleLedEffect`].
//!
//! Both go through a full black-out before showing a newly selected mode or
//! effect. All waits are polled against the frame clock.

mod daylight;
mod multi;
mod single;

use embassy_time::{Duration, Instant};

pub use daylight::{MIN_MOTION_BRIGHTNESS_PERCENT, motion_brightness_percent};
pub use multi::{AlarmStep, MultiStripController, select_mode};
pub use single::{PulseStep, RainbowLeg, SingleStripPlayer, SingleStep};

const EFFECT_NAME_NONE: &str = "none";
const EFFECT_NAME_TRIPLE_PULSE: &str = "triple_pulse";
const EFFECT_NAME_RAINBOW: &str = "rainbow";

const EFFECT_ID_NONE: u8 = 0;
const EFFECT_ID_TRIPLE_PULSE: u8 = 1;
const EFFECT_ID_RAINBOW: u8 = 2;

/// Built-in effect of a single strip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SingleEffect {
    /// Follow the commanded color
    #[default]
    None = EFFECT_ID_NONE,
    /// Dim glow with bursts of three bright pulses
    TriplePulse = EFFECT_ID_TRIPLE_PULSE,
    /// Slow red, green, blue cycle
    Rainbow = EFFECT_ID_RAINBOW,
}

impl SingleEffect {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_NONE => Self::None,
            EFFECT_ID_TRIPLE_PULSE => Self::TriplePulse,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => EFFECT_NAME_NONE,
            Self::TriplePulse => EFFECT_NAME_TRIPLE_PULSE,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_NONE => Some(Self::None),
            EFFECT_NAME_TRIPLE_PULSE => Some(Self::TriplePulse),
            EFFECT_NAME_RAINBOW => Some(Self::Rainbow),
            _ => None,
        }
    }
}

/// Global rendering mode, in ascending priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MultiMode {
    /// Both strips dark
    #[default]
    Idle,
    /// Each strip runs its own selected effect
    SingleLedEffect,
    /// Both strips show the motion light
    MotionDetected,
    /// Both strips flash red
    Alarm,
}

impl MultiMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SingleLedEffect => "single_led_effect",
            Self::MotionDetected => "motion_detected",
            Self::Alarm => "alarm",
        }
    }
}

/// Top-level phase shared by both effect tiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Fading to black before the selection is shown
    #[default]
    FadeOut,
    /// Showing the selection
    Display,
}

/// Start time of the current effect step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepTimer {
    started: Instant,
}

impl StepTimer {
    pub const fn new(now: Instant) -> Self {
        Self { started: now }
    }

    pub fn restart(&mut self, now: Instant) {
        self.started = now;
    }

    pub const fn started(&self) -> Instant {
        self.started
    }

    /// Whether at least `hold` has passed since the last restart
    pub fn elapsed(&self, now: Instant, hold: Duration) -> bool {
        now.saturating_duration_since(self.started) >= hold
    }
}

impl Default for StepTimer {
    fn default() -> Self {
        Self::new(Instant::from_millis(0))
    }
}
