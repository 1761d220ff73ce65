use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::RegisterBus;
use crate::command::FadeProfile;
use crate::effect::MultiStripController;
use crate::fade::{FadeEngine, FrameClock};
use crate::failsafe::{ConnectionSupervisor, FailSafeConfig, Supervision};
use crate::input::Inputs;
use crate::pwm::{HardwareMap, PwmWriter};
use crate::strip::StripId;

/// Configuration for the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    pub hardware: HardwareMap,
    /// Timing for intents, effects and fading to black
    pub fades: FadeProfile,
    pub fail_safe: FailSafeConfig,
}

/// Renderer - runs one frame of the whole pipeline
///
/// Effects are evaluated and faded for both strips before either strip is
/// flushed, so both strips show the same frame.
pub struct Renderer<B: RegisterBus> {
    engine: FadeEngine,
    controller: MultiStripController,
    supervisor: ConnectionSupervisor,
    writer: PwmWriter<B>,
}

impl<B: RegisterBus> Renderer<B> {
    pub fn new(bus: B, config: &ControllerConfig) -> Self {
        Self {
            engine: FadeEngine::new(config.fades),
            controller: MultiStripController::new(),
            supervisor: ConnectionSupervisor::new(config.fail_safe),
            writer: PwmWriter::new(bus, config.hardware),
        }
    }

    /// Initialise the PWM driver
    pub fn init(&mut self) -> Result<(), B::Error> {
        self.writer.init()
    }

    /// Process one frame
    ///
    /// While the fail-safe path holds the strips dark the effects are not
    /// evaluated, and the current mode starts over with a black-out once it
    /// lets go.
    pub fn render(&mut self, inputs: &Inputs, clock: FrameClock) -> Supervision {
        let supervision = self.supervisor.check(inputs.connectivity, clock.now);
        if supervision.forces_black() {
            self.engine.fade_all_to_black(clock);
            self.controller.restart(clock.now);
        } else {
            self.controller.run(inputs, &mut self.engine, clock);
        }
        self.flush();
        supervision
    }

    /// Fade both strips to black and flush, ignoring all inputs
    ///
    /// Returns true once both strips are dark.
    pub fn blackout(&mut self, clock: FrameClock) -> bool {
        let dark = self.engine.fade_all_to_black(clock);
        self.controller.restart(clock.now);
        self.flush();
        dark
    }

    /// Write the changed channels of both strips
    ///
    /// Returns the number of channels written.
    pub fn flush(&mut self) -> usize {
        let mut written = 0;
        for strip in StripId::ALL {
            written += self.writer.update_strip(strip, &self.engine.levels(strip));
        }
        written
    }

    /// Reset the effect state, e.g. after the driver was power cycled
    pub fn reset(&mut self, now: Instant) {
        #[cfg(feature = "esp32-log")]
        println!("[Renderer.reset] restarting effects");
        self.controller.restart(now);
        self.writer.invalidate();
    }

    pub const fn engine(&self) -> &FadeEngine {
        &self.engine
    }

    pub const fn controller(&self) -> &MultiStripController {
        &self.controller
    }

    pub const fn supervision(&self) -> Supervision {
        self.supervisor.state()
    }

    pub const fn writer(&self) -> &PwmWriter<B> {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut PwmWriter<B> {
        &mut self.writer
    }
}
