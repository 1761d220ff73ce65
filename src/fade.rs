//! Per-channel fade engine
//!
//! Each strip channel carries two independently fading values: the 8-bit
//! color and the 12-bit brightness. A value fades from its *anchor*, the last
//! target it actually reached, toward the commanded target. The anchor only
//! moves once the target is reached, so a target that changes mid-fade is
//! approached from the last settled value rather than from a target that was
//! never displayed.
//!
//! Fade timestamps slide forward while a value sits on its target, which makes
//! a new fade start counting from the frame before it was commanded. A value
//! only reports settled once it sat on its target at the start of a frame, so
//! a caller switching targets on settle always finds a freshly slid
//! timestamp.
//!
//! If a strip was not faded on the immediately preceding frame, all of its
//! timestamps restart at the current frame so the elapsed time cannot jump.

use embassy_time::Instant;

use crate::command::{FadeProfile, FadeSpec, LowLevelCommand, StripCommand};
use crate::strip::{PerChannel, PerStrip, StripId};

/// Time reference of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    pub now: Instant,
    /// Monotonic frame counter, used to detect skipped frames
    pub tick: u32,
}

impl FrameClock {
    pub const fn new(now: Instant, tick: u32) -> Self {
        Self { now, tick }
    }
}

/// Displayed color and brightness of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLevel {
    pub color: u8,
    pub brightness: u16,
}

/// One fading value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeValue {
    current: u16,
    anchor: u16,
    started: Instant,
}

impl FadeValue {
    const fn zero() -> Self {
        Self {
            current: 0,
            anchor: 0,
            started: Instant::from_millis(0),
        }
    }

    pub const fn current(&self) -> u16 {
        self.current
    }

    /// Value the running fade started from
    pub const fn anchor(&self) -> u16 {
        self.anchor
    }

    pub const fn started(&self) -> Instant {
        self.started
    }

    fn restart(&mut self, now: Instant) {
        self.started = now;
    }

    /// Advance toward `target`, returns true if the value is settled
    ///
    /// A timed fade reports settled from the frame after it reached its
    /// target. Zero-duration fades settle in the same frame.
    #[allow(clippy::cast_precision_loss)]
    fn advance(&mut self, target: u16, fade: FadeSpec, now: Instant) -> bool {
        if self.current == target {
            self.started = now;
            return true;
        }

        if fade.duration_ms == 0 {
            self.current = target;
            self.anchor = target;
            return true;
        }

        let elapsed = now.saturating_duration_since(self.started).as_millis();
        let percent = elapsed as f32 / f32::from(fade.duration_ms);
        self.current = fade.curve.value_at(percent, self.anchor, target);
        if self.current == target {
            self.anchor = target;
        }
        false
    }
}

/// Fade state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelFade {
    pub color: FadeValue,
    pub brightness: FadeValue,
}

impl ChannelFade {
    const fn zero() -> Self {
        Self {
            color: FadeValue::zero(),
            brightness: FadeValue::zero(),
        }
    }

    pub fn level(&self) -> ChannelLevel {
        ChannelLevel {
            color: u8::try_from(self.color.current).unwrap_or(u8::MAX),
            brightness: self.brightness.current,
        }
    }

    fn restart(&mut self, now: Instant) {
        self.color.restart(now);
        self.brightness.restart(now);
    }
}

/// Fade state of the five channels of one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripFade {
    channels: PerChannel<ChannelFade>,
    last_tick: Option<u32>,
    settled: bool,
}

impl Default for StripFade {
    fn default() -> Self {
        Self {
            channels: PerChannel::splat(ChannelFade::zero()),
            last_tick: None,
            settled: true,
        }
    }
}

impl StripFade {
    /// Advance all channels one frame toward `command`
    ///
    /// Returns true if every channel is settled on its target.
    pub fn advance(&mut self, command: &LowLevelCommand, clock: FrameClock) -> bool {
        let contiguous = self
            .last_tick
            .is_some_and(|last| last.wrapping_add(1) == clock.tick);
        if !contiguous {
            for fade in self.channels.values_mut() {
                fade.restart(clock.now);
            }
        }
        self.last_tick = Some(clock.tick);

        let mut settled = true;
        for (channel, fade) in self.channels.iter_mut() {
            let target = &command.channels[channel];
            settled &= fade.color.advance(
                u16::from(target.color),
                target.color_fade,
                clock.now,
            );
            settled &= fade.brightness.advance(
                target.brightness,
                target.brightness_fade,
                clock.now,
            );
        }
        self.settled = settled;
        settled
    }

    pub fn channels(&self) -> &PerChannel<ChannelFade> {
        &self.channels
    }

    pub fn levels(&self) -> PerChannel<ChannelLevel> {
        PerChannel::from_fn(|channel| self.channels[channel].level())
    }

    /// Whether the last advance ended with every channel on target
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    pub const fn last_tick(&self) -> Option<u32> {
        self.last_tick
    }
}

/// Fade engine for both strips
#[derive(Debug, Clone)]
pub struct FadeEngine {
    strips: PerStrip<StripFade>,
    profile: FadeProfile,
}

impl FadeEngine {
    pub fn new(profile: FadeProfile) -> Self {
        Self {
            strips: PerStrip::default(),
            profile,
        }
    }

    /// Timing used for intents and for fading to black
    pub const fn profile(&self) -> &FadeProfile {
        &self.profile
    }

    /// Low-level timing template with all targets at zero
    pub fn template(&self) -> LowLevelCommand {
        LowLevelCommand::from_profile(&self.profile)
    }

    /// Fade `strip` one frame toward `command`
    pub fn fade_to(
        &mut self,
        strip: StripId,
        command: impl Into<StripCommand>,
        clock: FrameClock,
    ) -> bool {
        let command = command.into().lower(&self.profile);
        self.strips[strip].advance(&command, clock)
    }

    /// Apply `command` to `strip` without fading
    pub fn set_to(
        &mut self,
        strip: StripId,
        command: impl Into<StripCommand>,
        clock: FrameClock,
    ) -> bool {
        let command = command.into().lower(&self.profile).instant();
        self.strips[strip].advance(&command, clock)
    }

    /// Fade both strips one frame toward the same command
    pub fn fade_all_to(&mut self, command: impl Into<StripCommand>, clock: FrameClock) -> bool {
        let command = command.into().lower(&self.profile);
        let one = self.strips[StripId::One].advance(&command, clock);
        let two = self.strips[StripId::Two].advance(&command, clock);
        one && two
    }

    /// Fade every value of `strip` to zero
    pub fn fade_to_black(&mut self, strip: StripId, clock: FrameClock) -> bool {
        let black = self.template();
        self.strips[strip].advance(&black, clock)
    }

    /// Fade both strips to zero
    pub fn fade_all_to_black(&mut self, clock: FrameClock) -> bool {
        let black = self.template();
        self.fade_all_to(black, clock)
    }

    pub fn strip(&self, strip: StripId) -> &StripFade {
        &self.strips[strip]
    }

    pub fn levels(&self, strip: StripId) -> PerChannel<ChannelLevel> {
        self.strips[strip].levels()
    }
}
