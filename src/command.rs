//! Command data hierarchy
//!
//! Commands exist on three levels:
//!
//! - [`StripIntent`]: what a collaborator asks for (power, shared color and
//!   white values, selected effect), without timing.
//! - [`HighLevelCommand`]: shared RGB and white values plus a [`FadeProfile`].
//! - [`LowLevelCommand`]: one color/brightness target and fade per physical
//!   channel. This is what the fade engine consumes.
//!
//! [`StripCommand`] wraps any of the three so a single fade operation can
//! accept them all. Conversion is always downward.

use embassy_time::Duration;

use crate::color::{Rgb, WHITE_TEMPERATURE_NEUTRAL, white_mix};
use crate::curve::FadeCurve;
use crate::effect::SingleEffect;
use crate::strip::{Channel, PerChannel};

/// Full-scale brightness value (12 bit)
pub const MAX_BRIGHTNESS: u16 = 4095;

/// Duration and curve of a single fade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FadeSpec {
    pub duration_ms: u16,
    pub curve: FadeCurve,
}

impl FadeSpec {
    pub const INSTANT: Self = Self::new(0, FadeCurve::None);

    pub const fn new(duration_ms: u16, curve: FadeCurve) -> Self {
        Self { duration_ms, curve }
    }

    pub const fn linear(duration_ms: u16) -> Self {
        Self::new(duration_ms, FadeCurve::Linear)
    }

    #[allow(clippy::cast_lossless)]
    pub const fn duration(self) -> Duration {
        Duration::from_millis(self.duration_ms as u64)
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u16) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Timing for the four shared parameters of a high-level command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeProfile {
    pub color: FadeSpec,
    pub color_brightness: FadeSpec,
    pub white_temperature: FadeSpec,
    pub white_brightness: FadeSpec,
}

impl FadeProfile {
    /// Regular fade timing
    ///
    /// White brightness fades faster since white LEDs visibly trail the RGB
    /// ones when switched off.
    pub const DEFAULT: Self = Self {
        color: FadeSpec::linear(1000),
        color_brightness: FadeSpec::linear(800),
        white_temperature: FadeSpec::linear(1000),
        white_brightness: FadeSpec::linear(600),
    };

    /// Apply everything immediately
    pub const INSTANT: Self = Self {
        color: FadeSpec::INSTANT,
        color_brightness: FadeSpec::INSTANT,
        white_temperature: FadeSpec::INSTANT,
        white_brightness: FadeSpec::INSTANT,
    };
}

impl Default for FadeProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Target and timing for one physical channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelCommand {
    /// 8-bit color value
    pub color: u8,
    pub color_fade: FadeSpec,
    /// 12-bit brightness value
    pub brightness: u16,
    pub brightness_fade: FadeSpec,
}

/// Per-channel command for a whole strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowLevelCommand {
    pub channels: PerChannel<ChannelCommand>,
}

impl LowLevelCommand {
    /// Timing template with all values at zero
    ///
    /// RGB channels take the color and color-brightness fades, white
    /// channels the white-temperature and white-brightness fades.
    pub fn from_profile(profile: &FadeProfile) -> Self {
        let channels = PerChannel::from_fn(|channel| {
            let (color_fade, brightness_fade) = if channel.is_white() {
                (profile.white_temperature, profile.white_brightness)
            } else {
                (profile.color, profile.color_brightness)
            };
            ChannelCommand {
                color: 0,
                color_fade,
                brightness: 0,
                brightness_fade,
            }
        });
        Self { channels }
    }

    /// Take the target values from `values` and the fades from `timing`
    pub fn combine(values: &Self, timing: &Self) -> Self {
        let mut combined = *timing;
        for (channel, command) in combined.channels.iter_mut() {
            command.color = values.channels[channel].color;
            command.brightness = values.channels[channel].brightness;
        }
        combined
    }

    #[must_use]
    pub fn with_color(mut self, channel: Channel, color: u8) -> Self {
        self.channels[channel].color = color;
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, channel: Channel, brightness: u16) -> Self {
        self.channels[channel].brightness = brightness;
        self
    }

    /// Set the colors of the three RGB channels
    #[must_use]
    pub fn with_rgb(self, color: Rgb) -> Self {
        self.with_color(Channel::Red, color.r)
            .with_color(Channel::Green, color.g)
            .with_color(Channel::Blue, color.b)
    }

    /// Set the same brightness, with the same fade, on the three RGB channels
    #[must_use]
    pub fn with_rgb_brightness(mut self, brightness: u16, fade: FadeSpec) -> Self {
        for channel in Channel::RGB {
            self.channels[channel].brightness = brightness;
            self.channels[channel].brightness_fade = fade;
        }
        self
    }

    /// Set the color fade of the three RGB channels
    #[must_use]
    pub fn with_rgb_color_fade(mut self, fade: FadeSpec) -> Self {
        for channel in Channel::RGB {
            self.channels[channel].color_fade = fade;
        }
        self
    }

    /// Replace every fade with an instant one, keeping the targets
    #[must_use]
    pub fn instant(self) -> Self {
        Self::combine(&self, &Self::from_profile(&FadeProfile::INSTANT))
    }
}

/// Shared RGB and white values with their timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighLevelCommand {
    pub color: Rgb,
    /// 12-bit brightness shared by the RGB channels
    pub color_brightness: u16,
    /// White temperature, `0` cold to `500` warm
    pub white_temperature: u16,
    /// 12-bit brightness shared by the white channels
    pub white_brightness: u16,
    pub fades: FadeProfile,
}

impl Default for HighLevelCommand {
    fn default() -> Self {
        Self {
            color: Rgb::default(),
            color_brightness: 0,
            white_temperature: WHITE_TEMPERATURE_NEUTRAL,
            white_brightness: 0,
            fades: FadeProfile::INSTANT,
        }
    }
}

impl HighLevelCommand {
    /// Broadcast the shared values onto the five channels
    pub fn to_low_level(&self) -> LowLevelCommand {
        let white = white_mix(self.white_temperature);
        let mut command = LowLevelCommand::from_profile(&self.fades).with_rgb(self.color);
        for channel in Channel::RGB {
            command.channels[channel].brightness = self.color_brightness;
        }
        command.channels[Channel::ColdWhite].color = white.cold;
        command.channels[Channel::WarmWhite].color = white.warm;
        for channel in Channel::WHITE {
            command.channels[channel].brightness = self.white_brightness;
        }
        command
    }

    #[must_use]
    pub const fn with_fades(mut self, fades: FadeProfile) -> Self {
        self.fades = fades;
        self
    }
}

/// Requested state of one strip as delivered by the network layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripIntent {
    pub power: bool,
    /// Requested values. Its `fades` are ignored; the timing comes from the
    /// profile used when lowering.
    pub command: HighLevelCommand,
    pub effect: SingleEffect,
}

impl StripIntent {
    /// Copy the requested values and take the timing from `profile`
    pub fn to_high_level(&self, profile: &FadeProfile) -> HighLevelCommand {
        self.command.with_fades(*profile)
    }
}

/// A command at any level of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripCommand {
    Intent(StripIntent),
    HighLevel(HighLevelCommand),
    LowLevel(LowLevelCommand),
}

impl StripCommand {
    /// Convert down to a low-level command
    ///
    /// `profile` supplies the timing for intents, which carry none. High- and
    /// low-level commands keep their own timing.
    pub fn lower(&self, profile: &FadeProfile) -> LowLevelCommand {
        match self {
            Self::Intent(intent) => intent.to_high_level(profile).to_low_level(),
            Self::HighLevel(command) => command.to_low_level(),
            Self::LowLevel(command) => *command,
        }
    }
}

impl From<StripIntent> for StripCommand {
    fn from(intent: StripIntent) -> Self {
        Self::Intent(intent)
    }
}

impl From<HighLevelCommand> for StripCommand {
    fn from(command: HighLevelCommand) -> Self {
        Self::HighLevel(command)
    }
}

impl From<LowLevelCommand> for StripCommand {
    fn from(command: LowLevelCommand) -> Self {
        Self::LowLevel(command)
    }
}
