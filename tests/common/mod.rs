#![allow(dead_code)]

use embassy_time::Instant;
use rgbcww_composer::pwm::{HardwareMap, reg};
use rgbcww_composer::{Channel, FrameClock, RegisterBus, StripId};

/// Frame period used by the simulated clock
pub const FRAME_MS: u64 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

/// Fake PCA9685 with a single register file
pub struct RecordingBus {
    pub registers: [u8; 256],
    pub writes: usize,
    /// Every successful write as (address, register, value)
    pub log: Vec<(u8, u8, u8)>,
    pub fail: bool,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self {
            registers: [0; 256],
            writes: 0,
            log: Vec::new(),
            fail: false,
        }
    }

    fn word(&self, register: u8) -> u16 {
        let low = self.registers[usize::from(register)];
        let high = self.registers[usize::from(register) + 1];
        u16::from_le_bytes([low, high])
    }

    pub fn on(&self, pin: u8) -> u16 {
        self.word(reg::led_on_l(pin))
    }

    pub fn off(&self, pin: u8) -> u16 {
        self.word(reg::led_on_l(pin) + 2)
    }

    /// Duty cycle programmed on `pin`
    pub fn duty(&self, pin: u8) -> u16 {
        (self.off(pin) + 4096 - self.on(pin)) % 4096
    }

    /// Duty cycle of `channel` on `strip` with the default wiring
    pub fn channel_duty(&self, strip: StripId, channel: Channel) -> u16 {
        let map = HardwareMap::default();
        self.duty(map.strips[strip][channel].pin)
    }

    pub fn strip_duties(&self, strip: StripId) -> [u16; 5] {
        Channel::ALL.map(|channel| self.channel_duty(strip, channel))
    }
}

impl RegisterBus for RecordingBus {
    type Error = BusError;

    fn write8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        if self.fail {
            return Err(BusError);
        }
        self.registers[usize::from(register)] = value;
        self.writes += 1;
        self.log.push((address, register, value));
        Ok(())
    }
}

pub fn clock(ms: u64, tick: u32) -> FrameClock {
    FrameClock::new(Instant::from_millis(ms), tick)
}

/// Frame clock of frame `tick` at the default frame period
pub fn frame(tick: u32) -> FrameClock {
    clock(u64::from(tick) * FRAME_MS, tick)
}
