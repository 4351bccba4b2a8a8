//! Bit-plane embedding of arbitrary files into RGBA images.
//!
//! Layout of the embedded bitstream:
//! - Each payload byte XORed with the rotating keystream, MSB first
//! - Followed by a sentinel of 32 zero bytes (256 zero bits)
//!
//! The stream is cut into chunks of `depth` bits. Chunks fill the selected
//! channels of each pixel in R, G, B, A order, pixels in row-major order.
//! Slots past the end of the stream are filled with random noise so the
//! whole image carries a uniform texture.

use image::RgbaImage;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::error::StegoError;
use super::keystream::Keystream;
use super::pixels::{extract_low_bits, linear_map, set_low_bits, BitDepth, ChannelMask};

/// Number of zero bytes terminating the payload.
pub const SENTINEL_BYTES: usize = 32;

/// Sentinel length in bits.
pub const SENTINEL_BITS: u64 = (SENTINEL_BYTES as u64) * 8;

/// Outcome of extracting a payload. Extraction itself never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The sentinel was found; the bytes before it are the payload.
    Complete(Vec<u8>),

    /// No sentinel anywhere in the image; every whole byte of capacity was
    /// decoded. The data is most likely not a payload for these settings.
    SentinelNotFound(Vec<u8>),
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        matches!(self, Extraction::Complete(_))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Extraction::Complete(bytes) | Extraction::SentinelNotFound(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Extraction::Complete(bytes) | Extraction::SentinelNotFound(bytes) => bytes,
        }
    }
}

/// Reads fixed-width chunks from a byte slice, MSB first.
///
/// A final short chunk is zero-filled on the right.
struct BitReader<'a> {
    bytes: &'a [u8],
    pos: u64,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn total_bits(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }

    fn take(&mut self, n: u8) -> Option<u8> {
        if self.pos >= self.total_bits() {
            return None;
        }
        let mut value = 0u8;
        for _ in 0..n {
            value <<= 1;
            if self.pos < self.total_bits() {
                let byte = self.bytes[(self.pos / 8) as usize];
                value |= (byte >> (7 - self.pos % 8)) & 1;
            }
            self.pos += 1;
        }
        Some(value)
    }
}

/// Packs fixed-width chunks into bytes, MSB first.
struct BitWriter {
    bytes: Vec<u8>,
    acc: u16,
    pending: u8,
}

impl BitWriter {
    fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            acc: 0,
            pending: 0,
        }
    }

    fn push(&mut self, value: u8, n: u8) {
        self.acc = (self.acc << n) | u16::from(extract_low_bits(value, n));
        self.pending += n;
        if self.pending >= 8 {
            self.pending -= 8;
            self.bytes.push((self.acc >> self.pending) as u8);
            self.acc &= (1u16 << self.pending) - 1;
        }
    }

    /// Returns the whole bytes written; trailing partial bits are dropped.
    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Finds the first byte offset followed by a full sentinel of zero bytes.
fn find_sentinel(stream: &[u8]) -> Option<usize> {
    let mut run = 0usize;
    for (i, byte) in stream.iter().enumerate() {
        if *byte == 0 {
            run += 1;
            if run == SENTINEL_BYTES {
                return Some(i + 1 - SENTINEL_BYTES);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Hides byte payloads in the low bits of selected image channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPlaneCodec {
    depth: BitDepth,
    mask: ChannelMask,
}

impl BitPlaneCodec {
    pub fn new(depth: BitDepth, mask: ChannelMask) -> Self {
        Self { depth, mask }
    }

    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    pub fn mask(&self) -> ChannelMask {
        self.mask
    }

    /// Total number of bits the image can carry with this configuration.
    pub fn capacity_bits(&self, width: u32, height: u32) -> u64 {
        u64::from(width)
            * u64::from(height)
            * u64::from(self.depth.get())
            * self.mask.len() as u64
    }

    /// Largest payload in bytes that still leaves room for the sentinel.
    pub fn max_payload_len(&self, width: u32, height: u32) -> u64 {
        (self.capacity_bits(width, height) / 8).saturating_sub(SENTINEL_BYTES as u64)
    }

    /// Bits needed to embed a payload of `len` bytes.
    pub fn required_bits(len: usize) -> u64 {
        len as u64 * 8 + SENTINEL_BITS
    }

    /// Embeds `payload` into `grid`, padding the remainder with thread-local noise.
    pub fn encode(
        &self,
        payload: &[u8],
        grid: &mut RgbaImage,
        keystream: Keystream,
    ) -> Result<(), StegoError> {
        self.encode_with_rng(payload, grid, keystream, &mut rand::thread_rng())
    }

    /// Embeds `payload` into `grid`, drawing noise padding from `rng`.
    ///
    /// Fails with [`StegoError::Capacity`] before the image is modified if
    /// the payload plus sentinel does not fit.
    pub fn encode_with_rng<R: Rng + ?Sized>(
        &self,
        payload: &[u8],
        grid: &mut RgbaImage,
        mut keystream: Keystream,
        rng: &mut R,
    ) -> Result<(), StegoError> {
        let (width, height) = grid.dimensions();
        let capacity_bits = self.capacity_bits(width, height);
        let needed_bits = Self::required_bits(payload.len());
        if needed_bits > capacity_bits {
            return Err(StegoError::Capacity {
                needed_bits,
                capacity_bits,
            });
        }

        let mut stream = keystream.apply(payload);
        stream.extend_from_slice(&[0u8; SENTINEL_BYTES]);

        debug!(
            payload_bytes = payload.len(),
            needed_bits,
            capacity_bits,
            depth = self.depth.get(),
            mask = %self.mask,
            "embedding payload"
        );

        let depth = self.depth.get();
        let levels = self.depth.levels();
        let mut bits = BitReader::new(&stream);
        let pixel_count = u64::from(width) * u64::from(height);

        for n in 0..pixel_count {
            let (x, y) = linear_map(n, width);
            let pixel = grid.get_pixel_mut(x, y);
            for channel in self.mask.channels() {
                let value = match bits.take(depth) {
                    Some(value) => value,
                    None => rng.gen_range(0..=levels),
                };
                let slot = &mut pixel.0[channel.index()];
                *slot = set_low_bits(*slot, value, depth);
            }
        }

        Ok(())
    }

    /// Reads the raw embedded stream (before un-XOR) from every pixel.
    fn raw_stream(&self, grid: &RgbaImage) -> Vec<u8> {
        let (width, height) = grid.dimensions();
        let depth = self.depth.get();
        let mask = self.mask;
        let pixel_count = u64::from(width) * u64::from(height);

        let chunks: Vec<u8> = (0..pixel_count)
            .into_par_iter()
            .flat_map_iter(|n| {
                let (x, y) = linear_map(n, width);
                let values = grid.get_pixel(x, y).0;
                mask.channels()
                    .map(move |channel| extract_low_bits(values[channel.index()], depth))
            })
            .collect();

        let mut writer = BitWriter::with_capacity(chunks.len() * depth as usize / 8);
        for chunk in chunks {
            writer.push(chunk, depth);
        }
        writer.finish()
    }

    /// Extracts a payload previously embedded with the same depth, mask and key.
    pub fn decode(&self, grid: &RgbaImage, mut keystream: Keystream) -> Extraction {
        let stream = self.raw_stream(grid);

        match find_sentinel(&stream) {
            Some(end) => {
                debug!(payload_bytes = end, "sentinel found");
                Extraction::Complete(keystream.apply(&stream[..end]))
            }
            None => {
                warn!(
                    decoded_bytes = stream.len(),
                    "no sentinel found, returning the whole capacity"
                );
                Extraction::SentinelNotFound(keystream.apply(&stream))
            }
        }
    }
}
