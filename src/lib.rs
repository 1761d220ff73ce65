#![no_std]

pub mod color;
pub mod command;
pub mod curve;
pub mod effect;
pub mod fade;
pub mod failsafe;
pub mod frame_scheduler;
pub mod input;
pub mod pwm;
pub mod renderer;
pub mod strip;

pub use command::{
    ChannelCommand, FadeProfile, FadeSpec, HighLevelCommand, LowLevelCommand, MAX_BRIGHTNESS,
    StripCommand, StripIntent,
};
pub use curve::FadeCurve;
pub use effect::{MultiMode, MultiStripController, SingleEffect, SingleStripPlayer, select_mode};
pub use fade::{ChannelLevel, FadeEngine, FrameClock};
pub use failsafe::{FailSafeConfig, Supervision};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use input::{InputQueue, InputSender, InputUpdate, Inputs, TrySendError};
pub use pwm::{HardwareMap, I2cBus, PwmWriter};
pub use renderer::{ControllerConfig, Renderer};
pub use strip::{Channel, InvalidStripId, StripId};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Register-level access to the PWM driver
///
/// Implement this trait to drive the controller from a bus other than
/// `embedded-hal` I2C. See [`I2cBus`] for the I2C adapter.
pub trait RegisterBus {
    type Error: core::fmt::Debug;

    /// Write one byte to `register` of the device at `address`
    fn write8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;
}
