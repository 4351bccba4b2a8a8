//! # Stegotool - hide files and images in pictures, and pictures in sound
//!
//! Three independent codecs:
//!
//! - **Bit planes**: any file is XORed with a rotating key and written into
//!   the low bits of chosen RGBA channels, terminated by a 256-bit zero
//!   sentinel. Unused slots are filled with noise.
//! - **Image in image**: a secondary picture is quantized to a few bits per
//!   channel and stored in the low bits of a carrier picture.
//! - **Spectrogram**: a picture is rendered as audio. Each column becomes a
//!   mix of sine tones weighted by the brightness of the matching rows.
//!
//! This is not encryption. The key is a repeating XOR mask and the
//! embedding makes no attempt to resist statistical analysis.
//!
//! ## Example Usage
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use stegotool::{BitDepth, BitPlaneCodec, ChannelMask, Extraction, Keystream};
//!
//! let mut carrier = RgbaImage::from_pixel(64, 64, Rgba([120, 80, 200, 255]));
//! let codec = BitPlaneCodec::new(BitDepth::new(2).unwrap(), ChannelMask::RGB);
//! let key = Keystream::from_passphrase("secret").unwrap();
//!
//! codec.encode(b"hello", &mut carrier, key.clone()).unwrap();
//! let extracted = codec.decode(&carrier, key);
//!
//! assert_eq!(extracted, Extraction::Complete(b"hello".to_vec()));
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: the codecs and their shared pixel helpers
//! - [`media`]: PNG and WAV loading/saving
//! - [`config`]: TOML presets for the spectrogram synthesizer
//! - [`logging`]: `tracing` subscriber setup used by the CLI

pub mod config;
pub mod logging;
pub mod media;
pub mod stego;

// Re-export commonly used types at the crate root
pub use config::ConfigError;
pub use media::MediaError;
pub use stego::{
    BitDepth, BitPlaneCodec, Channel, ChannelMask, Extraction, Keystream, PcmBuffer,
    QuantizeCodec, SpectrogramConfig, SpectrogramSynthesizer, StegoError,
};
