//! Global mode arbitration across both strips

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::daylight::motion_brightness_percent;
use super::{MultiMode, Phase, SingleStripPlayer, StepTimer};
use crate::color::RED;
use crate::command::{LowLevelCommand, MAX_BRIGHTNESS};
use crate::fade::{FadeEngine, FrameClock};
use crate::input::Inputs;
use crate::strip::{Channel, PerStrip, StripId};

const ALARM_DARK_HOLD: Duration = Duration::from_millis(500);
const ALARM_LIT_HOLD: Duration = Duration::from_millis(1500);

/// Steps of the alarm flash cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlarmStep {
    /// Fading both strips to black
    #[default]
    Blackout,
    /// Holding black
    Dark,
    /// Fading to saturated red
    FadeIn,
    /// Holding red
    Lit,
}

/// Pick the global mode for `inputs`, highest priority first
pub fn select_mode(inputs: &Inputs) -> MultiMode {
    if inputs.alarm {
        MultiMode::Alarm
    } else if !inputs.master_present {
        MultiMode::Idle
    } else if inputs.any_strip_powered() {
        MultiMode::SingleLedEffect
    } else if inputs.motion_detected && inputs.motion.enabled && inputs.sun.dark {
        MultiMode::MotionDetected
    } else {
        MultiMode::Idle
    }
}

/// Two-strip mode state machine
///
/// Every frame the mode is re-selected from the inputs. A new mode always
/// starts with both strips fading to black before it is shown.
#[derive(Clone, Debug)]
pub struct MultiStripController {
    mode: MultiMode,
    phase: Phase,
    alarm: AlarmStep,
    /// Completed alarm flashes
    counter: u32,
    timer: StepTimer,
    players: PerStrip<SingleStripPlayer>,
    settled: bool,
}

impl Default for MultiStripController {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiStripController {
    pub fn new() -> Self {
        Self {
            mode: MultiMode::Idle,
            phase: Phase::FadeOut,
            alarm: AlarmStep::Blackout,
            counter: 0,
            timer: StepTimer::default(),
            players: PerStrip::new(SingleStripPlayer::new(), SingleStripPlayer::new()),
            settled: false,
        }
    }

    /// Render one frame on both strips
    ///
    /// Returns true if both strips sit on their targets after this frame.
    pub fn run(&mut self, inputs: &Inputs, engine: &mut FadeEngine, clock: FrameClock) -> bool {
        let mode = select_mode(inputs);
        if mode != self.mode {
            #[cfg(feature = "esp32-log")]
            println!(
                "[MultiStripController.run] mode {} -> {}",
                self.mode.as_str(),
                mode.as_str()
            );
            self.mode = mode;
            self.restart(clock.now);
        }

        self.settled = match self.phase {
            Phase::FadeOut => {
                let dark = engine.fade_all_to_black(clock);
                if dark {
                    self.timer.restart(clock.now);
                    self.phase = Phase::Display;
                }
                dark
            }
            Phase::Display => self.display(inputs, engine, clock),
        };
        self.settled
    }

    /// Re-enter the black-out gate of the current mode
    ///
    /// Both strip players start their effects over as well. Used on a mode
    /// change and after the fail-safe path took over the strips.
    pub fn restart(&mut self, now: Instant) {
        self.phase = Phase::FadeOut;
        self.alarm = AlarmStep::Blackout;
        self.counter = 0;
        self.timer.restart(now);
        for (_, player) in self.players.iter_mut() {
            player.reset(now);
        }
    }

    fn display(&mut self, inputs: &Inputs, engine: &mut FadeEngine, clock: FrameClock) -> bool {
        match self.mode {
            MultiMode::Idle => engine.fade_all_to_black(clock),
            MultiMode::SingleLedEffect => {
                for (strip, player) in self.players.iter_mut() {
                    player.run(strip, &inputs.strips[strip], engine, clock);
                }
                self.players.iter().all(|(_, player)| player.is_settled())
            }
            MultiMode::MotionDetected => {
                let percent = if inputs.motion.time_based_brightness {
                    motion_brightness_percent(&inputs.sun, &inputs.clock)
                } else {
                    100
                };
                let command = inputs.motion.to_high_level(percent, *engine.profile());
                engine.fade_all_to(command, clock)
            }
            MultiMode::Alarm => self.alarm(engine, clock),
        }
    }

    fn alarm(&mut self, engine: &mut FadeEngine, clock: FrameClock) -> bool {
        match self.alarm {
            AlarmStep::Blackout => {
                let dark = engine.fade_all_to_black(clock);
                if dark {
                    self.timer.restart(clock.now);
                    self.alarm = AlarmStep::Dark;
                }
                dark
            }
            AlarmStep::Dark => {
                if self.timer.elapsed(clock.now, ALARM_DARK_HOLD) {
                    self.alarm = AlarmStep::FadeIn;
                }
                engine.fade_all_to_black(clock)
            }
            AlarmStep::FadeIn => {
                let lit = engine.fade_all_to(alarm_red(engine), clock);
                if lit {
                    self.timer.restart(clock.now);
                    self.alarm = AlarmStep::Lit;
                }
                lit
            }
            AlarmStep::Lit => {
                if self.timer.elapsed(clock.now, ALARM_LIT_HOLD) {
                    self.counter = self.counter.wrapping_add(1);
                    self.alarm = AlarmStep::Blackout;
                }
                engine.fade_all_to(alarm_red(engine), clock)
            }
        }
    }

    pub const fn mode(&self) -> MultiMode {
        self.mode
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn alarm_step(&self) -> AlarmStep {
        self.alarm
    }

    /// Completed alarm flashes since the alarm started
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    pub fn player(&self, strip: StripId) -> &SingleStripPlayer {
        &self.players[strip]
    }

    pub const fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Saturated red at full brightness, whites off
fn alarm_red(engine: &FadeEngine) -> LowLevelCommand {
    let template = engine.template();
    let fade = template.channels[Channel::Red].brightness_fade;
    template
        .with_rgb(RED)
        .with_rgb_brightness(MAX_BRIGHTNESS, fade)
}
