//! Pixel addressing and low-bit arithmetic shared by the image codecs.
//!
//! Pixels are visited row by row, left to right, top to bottom. Channel
//! values are plain `u8`s; every read-modify-write goes through the pure
//! helpers below so the codecs never manipulate bits ad hoc.

use std::fmt;
use std::str::FromStr;

use super::error::StegoError;

/// Maps a linear pixel index to `(x, y)` in row-major order.
///
/// `width` must be non-zero.
pub fn linear_map(n: u64, width: u32) -> (u32, u32) {
    debug_assert!(width > 0, "linear_map needs a non-empty row");
    let width = u64::from(width);
    ((n % width) as u32, (n / width) as u32)
}

/// Mask selecting the low `n` bits of a byte (`n` in `0..=8`).
#[inline]
pub fn low_mask(n: u8) -> u8 {
    if n >= 8 {
        0xFF
    } else {
        (1u8 << n) - 1
    }
}

/// Clears the low `n` bits of `value`, leaving the high bits intact.
#[inline]
pub fn clear_low_bits(value: u8, n: u8) -> u8 {
    value & !low_mask(n)
}

/// Replaces the low `n` bits of `value` with the low `n` bits of `bits`.
#[inline]
pub fn set_low_bits(value: u8, bits: u8, n: u8) -> u8 {
    clear_low_bits(value, n) | (bits & low_mask(n))
}

/// Reads the low `n` bits of `value`.
#[inline]
pub fn extract_low_bits(value: u8, n: u8) -> u8 {
    value & low_mask(n)
}

/// Number of low-order bits used per channel, always in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    /// Creates a bit depth, rejecting anything outside `1..=8`.
    pub fn new(bits: u8) -> Result<Self, StegoError> {
        if (1..=8).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(StegoError::InvalidBitDepth(bits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Highest level representable with this depth (`2^n - 1`).
    pub fn levels(self) -> u8 {
        low_mask(self.0)
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single color channel of an RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    /// Fixed visiting order within a pixel.
    pub const ORDER: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    /// Bit used for this channel in a [`ChannelMask`].
    pub fn bit(self) -> u8 {
        match self {
            Channel::Red => 1,
            Channel::Green => 2,
            Channel::Blue => 4,
            Channel::Alpha => 8,
        }
    }

    /// Position of the channel inside an RGB(A) pixel.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }
}

/// Set of channels selected for embedding (r=1, g=2, b=4, a=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelMask(u8);

impl ChannelMask {
    pub const RGB: ChannelMask = ChannelMask(0b0111);
    pub const RGBA: ChannelMask = ChannelMask(0b1111);

    /// Creates a mask from its numeric form, rejecting values above 15.
    pub fn new(bits: u32) -> Result<Self, StegoError> {
        if bits <= 0b1111 {
            Ok(Self(bits as u8))
        } else {
            Err(StegoError::InvalidChannelMask(bits))
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, channel: Channel) -> bool {
        self.0 & channel.bit() != 0
    }

    /// Number of selected channels.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Selected channels in R, G, B, A order.
    pub fn channels(self) -> impl Iterator<Item = Channel> {
        Channel::ORDER.into_iter().filter(move |c| self.contains(*c))
    }

    /// Same mask with alpha removed.
    pub fn rgb_only(self) -> Self {
        Self(self.0 & Self::RGB.0)
    }
}

impl FromStr for ChannelMask {
    type Err = StegoError;

    /// Accepts either the numeric style (`"5"`) or channel letters (`"rb"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bits) = s.parse::<u32>() {
            return Self::new(bits);
        }

        let mut bits = 0u8;
        for c in s.chars() {
            bits |= match c.to_ascii_lowercase() {
                'r' => Channel::Red.bit(),
                'g' => Channel::Green.bit(),
                'b' => Channel::Blue.bit(),
                'a' => Channel::Alpha.bit(),
                other => return Err(StegoError::UnknownChannel(other)),
            };
        }
        Ok(Self(bits))
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        for channel in self.channels() {
            let c = match channel {
                Channel::Red => 'R',
                Channel::Green => 'G',
                Channel::Blue => 'B',
                Channel::Alpha => 'A',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
