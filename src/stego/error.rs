//! Errors raised by the steganography codecs.

use thiserror::Error;

/// Errors that can occur while embedding or synthesizing.
///
/// Two families exist: capacity errors (the payload does not fit) and
/// configuration errors (a parameter is out of range). Both are raised
/// before any output is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StegoError {
    #[error("Payload does not fit: need {needed_bits} bits, image holds {capacity_bits}")]
    Capacity { needed_bits: u64, capacity_bits: u64 },

    #[error("Bit depth must be between 1 and 8, got {0}")]
    InvalidBitDepth(u8),

    #[error("Channel mask must be between 0 and 15 (r=1, g=2, b=4, a=8), got {0}")]
    InvalidChannelMask(u32),

    #[error("Unknown channel '{0}' (expected r, g, b or a)")]
    UnknownChannel(char),

    #[error("Keystream cannot be empty")]
    EmptyKeystream,

    #[error("{which} frequency {freq} Hz exceeds the Nyquist limit of {nyquist} Hz")]
    Nyquist {
        which: &'static str,
        freq: f64,
        nyquist: f64,
    },

    #[error("Frequencies cannot be negative, got {0} Hz")]
    NegativeFrequency(f64),

    #[error("Top frequency ({top} Hz) must be higher than base frequency ({base} Hz)")]
    InvertedRange { base: f64, top: f64 },

    #[error("Exponent must be greater than zero, got {0}")]
    InvalidExponent(f64),

    #[error("PCM bit depth must be a multiple of 8 between 8 and 32, got {0}")]
    InvalidPcmDepth(u16),

    #[error("Sine count must be at least 1")]
    NoSines,

    #[error("Samples per column must be at least 1")]
    NoSamples,

    #[error("Sample rate must be at least 1 Hz")]
    NoSampleRate,
}

impl StegoError {
    /// True for errors caused by the payload exceeding carrier capacity.
    pub fn is_capacity(&self) -> bool {
        matches!(self, StegoError::Capacity { .. })
    }

    /// True for errors caused by an invalid parameter.
    pub fn is_configuration(&self) -> bool {
        !self.is_capacity()
    }
}
