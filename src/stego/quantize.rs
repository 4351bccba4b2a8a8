//! Image-in-image steganography by bit-depth quantization.
//!
//! Each selected RGB channel of a secondary image is reduced to `depth`
//! bits and written into the low bits of the carrier. Extraction reads the
//! low bits back and stretches them to the full 0-255 range for viewing.
//! The transform is lossy and independent per pixel.

use image::imageops::{self, FilterType};
use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use super::pixels::{extract_low_bits, set_low_bits, BitDepth, ChannelMask};

/// Maps an 8-bit value to the nearest of `depth` levels.
pub fn quantize(value: u8, depth: BitDepth) -> u8 {
    let levels = f64::from(depth.levels());
    (f64::from(value) / 255.0 * levels + 0.5).floor() as u8
}

/// Stretches a quantized level back to a visible 8-bit value.
///
/// The gain is `255 / levels` truncated, so depths that don't divide 255
/// evenly come back slightly darker than the original.
pub fn expand(level: u8, depth: BitDepth) -> u8 {
    let gain = 255 / u16::from(depth.levels());
    (u16::from(level) * gain).min(255) as u8
}

/// Hides one RGB image in the low bits of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeCodec {
    depth: BitDepth,
    mask: ChannelMask,
}

impl QuantizeCodec {
    /// Creates a codec; alpha is never used by this mode and is dropped from the mask.
    pub fn new(depth: BitDepth, mask: ChannelMask) -> Self {
        Self {
            depth,
            mask: mask.rgb_only(),
        }
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn mask(&self) -> ChannelMask {
        self.mask
    }

    /// Embeds `secondary` into `carrier`, resizing it to the carrier's size if needed.
    pub fn encode(&self, carrier: &mut RgbImage, secondary: &RgbImage) {
        let (width, height) = carrier.dimensions();

        let resized;
        let secondary = if secondary.dimensions() != (width, height) {
            debug!(
                from_width = secondary.width(),
                from_height = secondary.height(),
                width,
                height,
                "resizing secondary image"
            );
            resized = imageops::resize(secondary, width, height, FilterType::Lanczos3);
            &resized
        } else {
            secondary
        };

        let depth = self.depth;
        let n = depth.get();
        let channels: Vec<usize> = self.mask.channels().map(|c| c.index()).collect();
        let row_len = width as usize * 3;
        if row_len == 0 {
            return;
        }

        carrier
            .par_chunks_mut(row_len)
            .zip(secondary.par_chunks(row_len))
            .for_each(|(carrier_row, secondary_row)| {
                for (dst, src) in carrier_row.chunks_exact_mut(3).zip(secondary_row.chunks_exact(3)) {
                    for &i in &channels {
                        dst[i] = set_low_bits(dst[i], quantize(src[i], depth), n);
                    }
                }
            });
    }

    /// Recovers a viewable approximation of the hidden image.
    ///
    /// Channels outside the mask are output as 0.
    pub fn decode(&self, carrier: &RgbImage) -> RgbImage {
        let (width, height) = carrier.dimensions();
        let mut output = RgbImage::new(width, height);
        let depth = self.depth;
        let n = depth.get();
        let channels: Vec<usize> = self.mask.channels().map(|c| c.index()).collect();
        let row_len = width as usize * 3;
        if row_len == 0 {
            return output;
        }

        output
            .par_chunks_mut(row_len)
            .zip(carrier.par_chunks(row_len))
            .for_each(|(out_row, carrier_row)| {
                for (dst, src) in out_row.chunks_exact_mut(3).zip(carrier_row.chunks_exact(3)) {
                    for &i in &channels {
                        dst[i] = expand(extract_low_bits(src[i], n), depth);
                    }
                }
            });

        output
    }
}
