//! Single-strip effect player

use embassy_time::{Duration, Instant};

use super::{Phase, SingleEffect, StepTimer};
use crate::color::{BLUE, GREEN, RED, Rgb};
use crate::command::{MAX_BRIGHTNESS, StripIntent};
use crate::fade::{FadeEngine, FrameClock};
use crate::strip::{Channel, StripId};

/// 12.5 % of full brightness
const PULSE_LOW_BRIGHTNESS: u16 = 512;
const PULSE_HIGH_BRIGHTNESS: u16 = MAX_BRIGHTNESS;

const PULSE_BASE_FADE_MS: u16 = 800;
const PULSE_FADE_MS: u16 = 400;

const PULSE_BASE_HOLD: Duration = Duration::from_millis(1500);
const PULSE_PEAK_HOLD: Duration = Duration::from_millis(100);
const PULSE_GAP_HOLD: Duration = Duration::from_millis(200);

/// Pulses after the first one in a burst
const PULSE_REPEATS: u8 = 2;

const RAINBOW_LEG_MS: u16 = 6000;

/// Steps of the triple pulse effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseStep {
    /// Dim glow held between bursts
    Base,
    /// Full brightness
    Peak,
    /// Back to the dim level after a peak
    Trough,
    /// Short dim pause between two peaks of a burst
    Gap,
}

impl PulseStep {
    /// Brightness target and its fade time in milliseconds
    const fn target(self) -> (u16, u16) {
        match self {
            Self::Base => (PULSE_LOW_BRIGHTNESS, PULSE_BASE_FADE_MS),
            Self::Peak => (PULSE_HIGH_BRIGHTNESS, PULSE_FADE_MS),
            Self::Trough | Self::Gap => (PULSE_LOW_BRIGHTNESS, PULSE_FADE_MS),
        }
    }
}

/// Legs of the rainbow cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RainbowLeg {
    Red,
    Green,
    Blue,
}

impl RainbowLeg {
    const fn color(self) -> Rgb {
        match self {
            Self::Red => RED,
            Self::Green => GREEN,
            Self::Blue => BLUE,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

/// Sub-state of the displayed effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SingleStep {
    /// Following the commanded color
    Follow,
    Pulse(PulseStep),
    Rainbow(RainbowLeg),
}

impl SingleStep {
    const fn initial(effect: SingleEffect) -> Self {
        match effect {
            SingleEffect::None => Self::Follow,
            SingleEffect::TriplePulse => Self::Pulse(PulseStep::Base),
            SingleEffect::Rainbow => Self::Rainbow(RainbowLeg::Red),
        }
    }
}

/// Effect state machine of one strip
#[derive(Clone, Debug)]
pub struct SingleStripPlayer {
    effect: SingleEffect,
    phase: Phase,
    step: SingleStep,
    counter: u8,
    timer: StepTimer,
    settled: bool,
}

impl Default for SingleStripPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SingleStripPlayer {
    pub fn new() -> Self {
        Self {
            effect: SingleEffect::None,
            phase: Phase::FadeOut,
            step: SingleStep::Follow,
            counter: 0,
            timer: StepTimer::default(),
            settled: false,
        }
    }

    /// Render one frame of `intent` on `strip`
    ///
    /// A powered-off strip fades to black without touching the effect state.
    pub fn run(
        &mut self,
        strip: StripId,
        intent: &StripIntent,
        engine: &mut FadeEngine,
        clock: FrameClock,
    ) {
        if !intent.power {
            self.settled = engine.fade_to_black(strip, clock);
            return;
        }

        if intent.effect != self.effect {
            self.select(intent.effect, clock);
        }

        match self.phase {
            Phase::FadeOut => {
                self.settled = engine.fade_to_black(strip, clock);
                if self.settled {
                    self.timer.restart(clock.now);
                    self.phase = Phase::Display;
                }
            }
            Phase::Display => match self.step {
                SingleStep::Follow => {
                    self.settled = engine.fade_to(strip, *intent, clock);
                }
                SingleStep::Pulse(step) => self.pulse(step, strip, intent, engine, clock),
                SingleStep::Rainbow(leg) => self.rainbow(leg, strip, intent, engine, clock),
            },
        }
    }

    /// Switch to `effect`, starting over with a black-out
    pub fn select(&mut self, effect: SingleEffect, clock: FrameClock) {
        self.effect = effect;
        self.reset(clock.now);
    }

    /// Start the selected effect over from its first step
    ///
    /// Used when the parent mode is re-entered.
    pub fn reset(&mut self, now: Instant) {
        self.phase = Phase::FadeOut;
        self.step = SingleStep::initial(self.effect);
        self.counter = 0;
        self.settled = false;
        self.timer.restart(now);
    }

    fn pulse(
        &mut self,
        step: PulseStep,
        strip: StripId,
        intent: &StripIntent,
        engine: &mut FadeEngine,
        clock: FrameClock,
    ) {
        let (brightness, fade_ms) = step.target();
        let template = engine.template();
        let fade = template.channels[Channel::Red]
            .brightness_fade
            .with_duration(fade_ms);
        let command = template
            .with_rgb(intent.command.color)
            .with_rgb_brightness(brightness, fade);

        self.settled = engine.fade_to(strip, command, clock);
        if !self.settled {
            self.timer.restart(clock.now);
            return;
        }

        let next = match step {
            PulseStep::Base => self
                .timer
                .elapsed(clock.now, PULSE_BASE_HOLD)
                .then_some(PulseStep::Peak),
            PulseStep::Peak => self
                .timer
                .elapsed(clock.now, PULSE_PEAK_HOLD)
                .then_some(PulseStep::Trough),
            PulseStep::Trough => {
                self.timer.restart(clock.now);
                if self.counter >= PULSE_REPEATS {
                    self.counter = 0;
                    Some(PulseStep::Base)
                } else {
                    self.counter += 1;
                    Some(PulseStep::Gap)
                }
            }
            PulseStep::Gap => self
                .timer
                .elapsed(clock.now, PULSE_GAP_HOLD)
                .then_some(PulseStep::Peak),
        };
        if let Some(next) = next {
            self.step = SingleStep::Pulse(next);
        }
    }

    fn rainbow(
        &mut self,
        leg: RainbowLeg,
        strip: StripId,
        intent: &StripIntent,
        engine: &mut FadeEngine,
        clock: FrameClock,
    ) {
        let template = engine.template();
        let red = template.channels[Channel::Red];
        let command = template
            .with_rgb(leg.color())
            .with_rgb_color_fade(red.color_fade.with_duration(RAINBOW_LEG_MS))
            .with_rgb_brightness(intent.command.color_brightness, red.brightness_fade);

        self.settled = engine.fade_to(strip, command, clock);
        if self.settled {
            self.step = SingleStep::Rainbow(leg.next());
        }
    }

    pub const fn effect(&self) -> SingleEffect {
        self.effect
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn step(&self) -> SingleStep {
        self.step
    }

    pub const fn counter(&self) -> u8 {
        self.counter
    }

    /// Whether the strip reached its target on the last frame
    pub const fn is_settled(&self) -> bool {
        self.settled
    }
}
