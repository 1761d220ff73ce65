/// Coldest white temperature value
pub const WHITE_TEMPERATURE_COLD: u16 = 0;

/// Neutral white temperature value, both white channels at full color
pub const WHITE_TEMPERATURE_NEUTRAL: u16 = 250;

/// Warmest white temperature value
pub const WHITE_TEMPERATURE_WARM: u16 = 500;

/// Cold-white and warm-white color values for a white temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhiteMix {
    pub cold: u8,
    pub warm: u8,
}

/// Split a white temperature (`0..=500`) into cold/warm channel colors
///
/// The scale runs from cold at `0` to warm at `500`, like mireds. One of
/// the two channels is always saturated. At exactly
/// [`WHITE_TEMPERATURE_NEUTRAL`] both are.
pub fn white_mix(temperature: u16) -> WhiteMix {
    let temperature = temperature.min(WHITE_TEMPERATURE_WARM);

    let cold = if temperature >= WHITE_TEMPERATURE_NEUTRAL {
        map_range(
            temperature,
            WHITE_TEMPERATURE_WARM,
            WHITE_TEMPERATURE_NEUTRAL,
        )
    } else {
        u8::MAX
    };

    let warm = if temperature <= WHITE_TEMPERATURE_NEUTRAL {
        map_range(
            temperature,
            WHITE_TEMPERATURE_COLD,
            WHITE_TEMPERATURE_NEUTRAL,
        )
    } else {
        u8::MAX
    };

    WhiteMix { cold, warm }
}

/// Map `value` from `from..=to` onto `0..=255`, either direction
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn map_range(value: u16, from: u16, to: u16) -> u8 {
    let value = i32::from(value);
    let from = i32::from(from);
    let to = i32::from(to);
    let mapped = (value - from) * 255 / (to - from);
    mapped.clamp(0, 255) as u8
}
