//! PCA9685 PWM output
//!
//! Each strip channel is wired to one output of a 16-channel PCA9685. The
//! five channels of a strip switch on at staggered points of the 4096-step
//! PWM period so their edges never coincide.

use embedded_hal::i2c::I2c;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::RegisterBus;
use crate::command::MAX_BRIGHTNESS;
use crate::fade::ChannelLevel;
use crate::strip::{Channel, PerChannel, PerStrip, StripId};

/// Default I2C address of the PCA9685
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Steps in one PWM period
pub const PWM_PERIOD: u16 = 4096;

/// PCA9685 register addresses
pub mod reg {
    pub const MODE1: u8 = 0x00;
    pub const MODE2: u8 = 0x01;
    /// First of the four ON_L, ON_H, OFF_L, OFF_H registers of output 0
    pub const LED0_ON_L: u8 = 0x06;
    pub const PRE_SCALE: u8 = 0xFE;

    /// MODE1: oscillator off
    pub const MODE1_SLEEP: u8 = 0x10;
    /// MODE2: totem-pole outputs
    pub const MODE2_OUTDRV: u8 = 0x04;
    /// About 1526 Hz with the internal 25 MHz oscillator
    pub const PRE_SCALE_1526_HZ: u8 = 0x03;

    /// ON_L register of output `pin`
    pub const fn led_on_l(pin: u8) -> u8 {
        LED0_ON_L + 4 * (pin & 0x0F)
    }
}

/// Duty cycle (0..=4095) for one channel
///
/// Zero if either the color or the brightness is zero, otherwise the color
/// scaled to 12 bit, then by brightness, rounded and saturated.
pub fn duty(level: ChannelLevel) -> u16 {
    if level.color == 0 || level.brightness == 0 {
        return 0;
    }
    let max = u32::from(MAX_BRIGHTNESS);
    let brightness = u32::from(level.brightness.min(MAX_BRIGHTNESS));
    let scaled = (u32::from(level.color) + 1) * 16 * brightness;
    let duty = ((scaled + max / 2) / max).min(max);
    u16::try_from(duty).unwrap_or(MAX_BRIGHTNESS)
}

/// Turn-on point of `channel` within the PWM period
pub const fn phase_offset(channel: Channel) -> u16 {
    match channel {
        Channel::Red => 0,
        Channel::ColdWhite => 819,
        Channel::Green => 1639,
        Channel::WarmWhite => 2459,
        Channel::Blue => 3279,
    }
}

/// Output pin and phase of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOutput {
    /// PCA9685 output, 0..=15
    pub pin: u8,
    pub phase: u16,
}

/// Wiring of both strips to the PCA9685
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareMap {
    pub address: u8,
    pub strips: PerStrip<PerChannel<ChannelOutput>>,
}

impl HardwareMap {
    /// Build a map from output pins listed in R, G, B, CW, WW order
    pub fn from_pins(address: u8, one: [u8; Channel::COUNT], two: [u8; Channel::COUNT]) -> Self {
        let outputs = |pins: [u8; Channel::COUNT]| {
            PerChannel::from_fn(|channel| ChannelOutput {
                pin: pins[channel.index()] & 0x0F,
                phase: phase_offset(channel),
            })
        };
        Self {
            address,
            strips: PerStrip::new(outputs(one), outputs(two)),
        }
    }

    /// Move `channel` of `strip` to another output pin
    #[must_use]
    pub fn with_pin(mut self, strip: StripId, channel: Channel, pin: u8) -> Self {
        self.strips[strip][channel].pin = pin & 0x0F;
        self
    }
}

impl Default for HardwareMap {
    fn default() -> Self {
        Self::from_pins(DEFAULT_ADDRESS, [5, 6, 4, 3, 7], [10, 11, 9, 8, 12])
    }
}

/// Writes channel levels to the PCA9685, skipping unchanged channels
pub struct PwmWriter<B: RegisterBus> {
    bus: B,
    map: HardwareMap,
    /// Last level written per channel, `None` until the first good write
    shadow: PerStrip<PerChannel<Option<ChannelLevel>>>,
}

impl<B: RegisterBus> PwmWriter<B> {
    pub fn new(bus: B, map: HardwareMap) -> Self {
        Self {
            bus,
            map,
            shadow: PerStrip::splat(PerChannel::splat(None)),
        }
    }

    /// Configure the driver: sleep, set the prescaler, wake, totem-pole outputs
    ///
    /// All channels are rewritten on the next update.
    pub fn init(&mut self) -> Result<(), B::Error> {
        let address = self.map.address;
        self.bus.write8(address, reg::MODE1, reg::MODE1_SLEEP)?;
        self.bus
            .write8(address, reg::PRE_SCALE, reg::PRE_SCALE_1526_HZ)?;
        self.bus.write8(address, reg::MODE1, 0x00)?;
        self.bus.write8(address, reg::MODE2, reg::MODE2_OUTDRV)?;
        self.invalidate();

        #[cfg(feature = "esp32-log")]
        println!("[PwmWriter.init] PCA9685 at {:#04x} ready", address);
        Ok(())
    }

    /// Flush the changed channels of `strip`
    ///
    /// Returns the number of channels written. A channel whose write fails
    /// stays dirty and is written again on the next update.
    pub fn update_strip(&mut self, strip: StripId, levels: &PerChannel<ChannelLevel>) -> usize {
        let mut written = 0;
        for (channel, level) in levels.iter() {
            if self.shadow[strip][channel] == Some(*level) {
                continue;
            }
            let output = self.map.strips[strip][channel];
            match self.write_output(output, duty(*level)) {
                Ok(()) => {
                    self.shadow[strip][channel] = Some(*level);
                    written += 1;
                }
                Err(_err) => {
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[PwmWriter.update_strip] strip {} pin {} write failed: {:?}",
                        strip.number(),
                        output.pin,
                        _err
                    );
                }
            }
        }
        written
    }

    fn write_output(&mut self, output: ChannelOutput, duty: u16) -> Result<(), B::Error> {
        let on = output.phase % PWM_PERIOD;
        let off = (duty + on) % PWM_PERIOD;
        let base = reg::led_on_l(output.pin);
        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        let address = self.map.address;
        self.bus.write8(address, base, on_l)?;
        self.bus.write8(address, base + 1, on_h)?;
        self.bus.write8(address, base + 2, off_l)?;
        self.bus.write8(address, base + 3, off_h)
    }

    /// Forget what was written so every channel is flushed again
    pub fn invalidate(&mut self) {
        self.shadow = PerStrip::splat(PerChannel::splat(None));
    }

    pub const fn map(&self) -> &HardwareMap {
        &self.map
    }

    pub const fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

/// [`RegisterBus`] over an `embedded-hal` I2C bus
pub struct I2cBus<I> {
    i2c: I,
}

impl<I: I2c> I2cBus<I> {
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterBus for I2cBus<I> {
    type Error = I::Error;

    fn write8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[register, value])
    }
}
