//! Steganography codecs operating on in-memory pixel grids.
//!
//! - [`bitplane`]: any file hidden in the low bits of RGBA channels
//! - [`quantize`]: an image hidden in another image by bit-depth reduction
//! - [`spectrogram`]: an image rendered as audio, visible in a spectrogram
//!
//! Loading and saving files lives in [`crate::media`]; nothing here does I/O.

pub mod bitplane;
pub mod error;
pub mod keystream;
pub mod pixels;
pub mod quantize;
pub mod spectrogram;

pub use bitplane::{BitPlaneCodec, Extraction, SENTINEL_BITS, SENTINEL_BYTES};
pub use error::StegoError;
pub use keystream::Keystream;
pub use pixels::{
    clear_low_bits, extract_low_bits, linear_map, set_low_bits, BitDepth, Channel, ChannelMask,
};
pub use quantize::QuantizeCodec;
pub use spectrogram::{
    luminance, synthesize, PcmBuffer, SpectrogramConfig, SpectrogramSynthesizer, ToneTable,
};
