//! Strip and channel addressing
//!
//! The controller drives exactly two strips with five channels each. Both
//! are addressed through closed enums that index fixed-size arrays, so an
//! out-of-range strip or channel cannot be expressed once decoded.

use core::ops::{Index, IndexMut};

/// One of the two LED strip outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripId {
    One,
    Two,
}

/// Error returned when decoding a strip number other than 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStripId(pub u8);

impl StripId {
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Strip number as printed on the board (1 or 2)
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for StripId {
    type Error = InvalidStripId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(InvalidStripId(other)),
        }
    }
}

/// Physical color channel of a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    ColdWhite = 3,
    WarmWhite = 4,
}

impl Channel {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::ColdWhite,
        Self::WarmWhite,
    ];

    pub const RGB: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    pub const WHITE: [Self; 2] = [Self::ColdWhite, Self::WarmWhite];

    /// Decode an output type code (R, G, B, CW, WW)
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Red,
            1 => Self::Green,
            2 => Self::Blue,
            3 => Self::ColdWhite,
            4 => Self::WarmWhite,
            _ => return None,
        })
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_white(self) -> bool {
        matches!(self, Self::ColdWhite | Self::WarmWhite)
    }
}

/// One value per strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerStrip<T>([T; 2]);

impl<T> PerStrip<T> {
    pub const fn new(one: T, two: T) -> Self {
        Self([one, two])
    }

    pub fn iter(&self) -> impl Iterator<Item = (StripId, &T)> {
        StripId::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StripId, &mut T)> {
        StripId::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T: Copy> PerStrip<T> {
    pub const fn splat(value: T) -> Self {
        Self([value; 2])
    }
}

impl<T> Index<StripId> for PerStrip<T> {
    type Output = T;

    fn index(&self, strip: StripId) -> &T {
        &self.0[strip.index()]
    }
}

impl<T> IndexMut<StripId> for PerStrip<T> {
    fn index_mut(&mut self, strip: StripId) -> &mut T {
        &mut self.0[strip.index()]
    }
}

/// One value per color channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerChannel<T>([T; Channel::COUNT]);

impl<T> PerChannel<T> {
    pub const fn new(values: [T; Channel::COUNT]) -> Self {
        Self(values)
    }

    /// Build by evaluating `f` for every channel in [`Channel::ALL`] order
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self(Channel::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Channel, &mut T)> {
        Channel::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.iter_mut()
    }
}

impl<T: Copy> PerChannel<T> {
    pub const fn splat(value: T) -> Self {
        Self([value; Channel::COUNT])
    }
}

impl<T> Index<Channel> for PerChannel<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.0[channel.index()]
    }
}

impl<T> IndexMut<Channel> for PerChannel<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.0[channel.index()]
    }
}
