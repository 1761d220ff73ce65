//! Night dimming curve for the motion light

use crate::input::{SunState, WallClock};

/// Brightness percent in the middle of the night
pub const MIN_MOTION_BRIGHTNESS_PERCENT: u8 = 13;

const FULL: u8 = 100;

/// Brightness percent at the start of each hour
const HOURLY_PERCENT: [u8; 24] = [
    13, 13, 13, 13, 25, 38, 50, 75, // 00..08
    100, 100, 100, 100, 100, 100, 100, 100, // 08..16
    100, 100, 100, 100, 100, 75, 50, 38, // 16..24
];

/// Brightness percent of the motion light at the current time
///
/// Between a known sunset and the following sunrise the light dims linearly
/// down to [`MIN_MOTION_BRIGHTNESS_PERCENT`] at the midpoint of the night and
/// back up to full brightness at sunrise. Without usable sun times the hourly
/// table is interpolated by minute.
pub fn motion_brightness_percent(sun: &SunState, clock: &WallClock) -> u8 {
    match (sun.sunset, sun.sunrise) {
        (Some(sunset), Some(sunrise)) if sunset < sunrise => {
            night_percent(clock.unix, sunset, sunrise)
        }
        _ => hourly_percent(clock.hour, clock.minute),
    }
}

fn night_percent(now: u64, sunset: u64, sunrise: u64) -> u8 {
    let midnight = sunset + (sunrise - sunset) / 2;
    if now <= sunset || now >= sunrise {
        FULL
    } else if now <= midnight {
        map_range(now, sunset, midnight, FULL, MIN_MOTION_BRIGHTNESS_PERCENT)
    } else {
        map_range(now, midnight, sunrise, MIN_MOTION_BRIGHTNESS_PERCENT, FULL)
    }
}

fn hourly_percent(hour: u8, minute: u8) -> u8 {
    let hour = usize::from(hour % 24);
    let from = HOURLY_PERCENT[hour];
    let to = HOURLY_PERCENT[(hour + 1) % 24];
    map_range(u64::from(minute.min(59)), 0, 60, from, to)
}

/// Integer linear map of `value` from `[in_min, in_max]` onto `[out_a, out_b]`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn map_range(value: u64, in_min: u64, in_max: u64, out_a: u8, out_b: u8) -> u8 {
    if in_max <= in_min {
        return out_b;
    }
    let span = (in_max - in_min) as i64;
    let offset = (value.clamp(in_min, in_max) - in_min) as i64;
    let delta = i64::from(out_b) - i64::from(out_a);
    let mapped = i64::from(out_a) + delta * offset / span;
    mapped.clamp(0, i64::from(FULL)) as u8
}
