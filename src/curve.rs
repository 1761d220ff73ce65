//! Fade curve functions
//!
//! Every curve maps a progress value in `[0, 1]` onto the segment between a
//! start and an end value. Progress outside that range is clamped, so a fade
//! that overruns its duration lands exactly on the end value.

/// Interpolation curve used by a channel fade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum FadeCurve {
    /// Jump to the end value immediately
    #[default]
    None = 0,
    Linear = 1,
    /// Quartic ease-in
    EaseIn = 2,
    /// Quartic ease-out
    EaseOut = 3,
    /// Quartic ease-in-out
    EaseInOut = 4,
}

impl FadeCurve {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::None,
            1 => Self::Linear,
            2 => Self::EaseIn,
            3 => Self::EaseOut,
            4 => Self::EaseInOut,
            _ => return None,
        })
    }

    /// Eased progress for a linear `percent`
    ///
    /// The result is `0.0` at `percent == 0.0` and `1.0` at `percent == 1.0`
    /// for every curve except [`FadeCurve::None`], which is always `1.0`.
    pub fn ease(self, percent: f32) -> f32 {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 1.0)
        };
        match self {
            Self::None => 1.0,
            Self::Linear => percent,
            Self::EaseIn => libm::powf(percent, 4.0),
            Self::EaseOut => 1.0 - libm::powf(1.0 - percent, 4.0),
            Self::EaseInOut => {
                if percent < 0.5 {
                    8.0 * libm::powf(percent, 4.0)
                } else {
                    1.0 - libm::powf(-2.0 * percent + 2.0, 4.0) / 2.0
                }
            }
        }
    }

    /// Value of the curve between `start` and `end` at `percent`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn value_at(self, percent: f32, start: u16, end: u16) -> u16 {
        if self == Self::None {
            return end;
        }
        let start_f = f32::from(start);
        let delta = f32::from(end) - start_f;
        let value = libm::roundf(start_f + delta * self.ease(percent));
        value.clamp(0.0, f32::from(u16::MAX)) as u16
    }
}

/// Linear interpolation between `start` and `end`
pub fn linear(percent: f32, start: u16, end: u16) -> u16 {
    FadeCurve::Linear.value_at(percent, start, end)
}

/// Quartic ease-in between `start` and `end`
pub fn ease_in_quart(percent: f32, start: u16, end: u16) -> u16 {
    FadeCurve::EaseIn.value_at(percent, start, end)
}

/// Quartic ease-out between `start` and `end`
pub fn ease_out_quart(percent: f32, start: u16, end: u16) -> u16 {
    FadeCurve::EaseOut.value_at(percent, start, end)
}

/// Quartic ease-in-out between `start` and `end`
pub fn ease_in_out_quart(percent: f32, start: u16, end: u16) -> u16 {
    FadeCurve::EaseInOut.value_at(percent, start, end)
}
