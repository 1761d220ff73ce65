//! Collaborator inputs
//!
//! The network layer, PIR sensor and connection manager publish
//! [`InputUpdate`]s into an [`InputQueue`]. The frame scheduler folds them
//! into an [`Inputs`] snapshot before every frame, so a whole frame is always
//! rendered from one consistent view.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::color::{Rgb, WHITE_TEMPERATURE_NEUTRAL};
use crate::command::{FadeProfile, HighLevelCommand, MAX_BRIGHTNESS, StripIntent};
use crate::strip::{PerStrip, StripId};

/// Day/night state from the network layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SunState {
    pub dark: bool,
    /// Unix time of the last known sunset
    pub sunset: Option<u64>,
    /// Unix time of the next known sunrise
    pub sunrise: Option<u64>,
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallClock {
    pub unix: u64,
    pub hour: u8,
    pub minute: u8,
}

/// Link state of the network collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connectivity {
    pub wifi: bool,
    pub mqtt: bool,
}

impl Connectivity {
    pub const UP: Self = Self {
        wifi: true,
        mqtt: true,
    };

    /// Commands can only arrive while both links are up
    ///
    /// Losing either Wi-Fi or MQTT counts as a lost link for the fail-safe.
    pub const fn is_up(self) -> bool {
        self.wifi && self.mqtt
    }
}

/// Light shown on both strips when motion is detected in the dark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSettings {
    pub enabled: bool,
    /// Dim the light at night following the daylight curve
    pub time_based_brightness: bool,
    pub color: Rgb,
    pub color_brightness: u16,
    pub white_temperature: u16,
    pub white_brightness: u16,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time_based_brightness: false,
            color: Rgb::default(),
            color_brightness: 0,
            white_temperature: WHITE_TEMPERATURE_NEUTRAL,
            white_brightness: MAX_BRIGHTNESS,
        }
    }
}

impl MotionSettings {
    /// Motion light with both brightness values scaled to `percent`
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_high_level(&self, percent: u8, fades: FadeProfile) -> HighLevelCommand {
        let percent = u32::from(percent.min(100));
        let scale = |brightness: u16| (u32::from(brightness) * percent / 100) as u16;
        HighLevelCommand {
            color: self.color,
            color_brightness: scale(self.color_brightness),
            white_temperature: self.white_temperature,
            white_brightness: scale(self.white_brightness),
            fades,
        }
    }
}

/// Everything the renderer reads in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    pub strips: PerStrip<StripIntent>,
    pub alarm: bool,
    /// A master controller has claimed this device
    pub master_present: bool,
    pub motion: MotionSettings,
    /// Latched PIR output, debounced upstream
    pub motion_detected: bool,
    pub sun: SunState,
    pub clock: WallClock,
    pub connectivity: Connectivity,
}

impl Inputs {
    /// Fold one update into the snapshot
    pub fn apply(&mut self, update: InputUpdate) {
        match update {
            InputUpdate::Strip(strip, intent) => self.strips[strip] = intent,
            InputUpdate::Alarm(alarm) => self.alarm = alarm,
            InputUpdate::MasterPresent(present) => self.master_present = present,
            InputUpdate::Motion(settings) => self.motion = settings,
            InputUpdate::MotionDetected(detected) => self.motion_detected = detected,
            InputUpdate::Dark(dark) => self.sun.dark = dark,
            InputUpdate::SunTimes { sunset, sunrise } => {
                self.sun.sunset = sunset;
                self.sun.sunrise = sunrise;
            }
            InputUpdate::Clock(clock) => self.clock = clock,
            InputUpdate::Connectivity(connectivity) => self.connectivity = connectivity,
        }
    }

    /// Whether any strip is switched on
    pub fn any_strip_powered(&self) -> bool {
        self.strips.iter().any(|(_, intent)| intent.power)
    }
}

/// Change published by a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputUpdate {
    Strip(StripId, StripIntent),
    Alarm(bool),
    MasterPresent(bool),
    Motion(MotionSettings),
    MotionDetected(bool),
    Dark(bool),
    SunTimes {
        sunset: Option<u64>,
        sunrise: Option<u64>,
    },
    Clock(WallClock),
    Connectivity(Connectivity),
}

/// Error returned when the queue is full, carrying back the rejected value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Bounded multi-producer queue of input updates
///
/// Guarded by a critical section, so producers may run in other tasks or in
/// interrupt handlers.
pub struct InputQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<InputUpdate, SIZE>>>,
}

impl<const SIZE: usize> InputQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> InputSender<'_, SIZE> {
        InputSender { queue: self }
    }

    /// Queue `update`, or hand it back if the queue is full
    pub fn try_send(&self, update: InputUpdate) -> Result<(), TrySendError<InputUpdate>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(update).map_err(TrySendError)
        })
    }

    /// Apply every pending update to `inputs` in arrival order
    ///
    /// Returns the number of updates applied.
    pub fn drain_into(&self, inputs: &mut Inputs) -> usize {
        let mut applied = 0;
        while let Some(update) = self.pop() {
            inputs.apply(update);
            applied += 1;
        }
        applied
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pop(&self) -> Option<InputUpdate> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for InputQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable producer handle of an [`InputQueue`]
#[derive(Clone, Copy)]
pub struct InputSender<'a, const SIZE: usize> {
    queue: &'a InputQueue<SIZE>,
}

impl<const SIZE: usize> InputSender<'_, SIZE> {
    pub fn try_send(&self, update: InputUpdate) -> Result<(), TrySendError<InputUpdate>> {
        self.queue.try_send(update)
    }

    /// Publish a new intent for `strip`
    pub fn send_strip(
        &self,
        strip: StripId,
        intent: StripIntent,
    ) -> Result<(), TrySendError<InputUpdate>> {
        self.try_send(InputUpdate::Strip(strip, intent))
    }
}
