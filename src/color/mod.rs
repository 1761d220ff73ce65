mod white;

pub use white::{
    WHITE_TEMPERATURE_COLD, WHITE_TEMPERATURE_NEUTRAL, WHITE_TEMPERATURE_WARM, WhiteMix,
    white_mix,
};
use smart_leds::RGB8;

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
