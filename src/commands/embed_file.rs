//! Embed command - hide any file in the low bits of an image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{info, warn};

use stegotool::media::{load_rgba, read_payload, save_png};
use stegotool::{BitDepth, BitPlaneCodec, ChannelMask};

use super::{keystream_from, CommandExecutor};

/// Hide a file inside an image.
///
/// The output is always written as PNG; lossy formats would destroy the
/// hidden bits.
#[derive(Args, Debug)]
pub struct EmbedFileCommand {
    /// File to hide
    #[arg(short, long)]
    pub input: PathBuf,

    /// Carrier image (any format the image decoder understands)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of low bits used per channel (1-8)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// Channels to write: letters ("rgb", "ra") or a sum of r=1, g=2, b=4, a=8
    #[arg(long, default_value = "rgb")]
    pub channels: ChannelMask,

    /// Key XORed over the file bytes; the same key is needed to extract
    #[arg(short, long)]
    pub key: Option<String>,

    /// Seed for the noise written after the payload (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CommandExecutor for EmbedFileCommand {
    fn execute(&self) -> Result<()> {
        let payload = read_payload(&self.input)
            .with_context(|| format!("Failed to read input file {}", self.input.display()))?;
        let mut carrier = load_rgba(&self.carrier)
            .with_context(|| format!("Failed to load carrier image {}", self.carrier.display()))?;

        let codec = BitPlaneCodec::new(BitDepth::new(self.bits)?, self.channels);
        let (width, height) = carrier.dimensions();
        let max_len = codec.max_payload_len(width, height);
        info!(width, height, max_len, "carrier loaded");

        let key = keystream_from(self.key.as_deref())?;
        if key.is_identity() {
            warn!("no effective key; file bytes are stored as-is");
        }
        let result = match self.seed {
            Some(seed) => {
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                codec.encode_with_rng(&payload, &mut carrier, key, &mut rng)
            }
            None => codec.encode(&payload, &mut carrier, key),
        };
        result.context("Can't fit file into image; use more bits or channels")?;

        save_png(&carrier, &self.output)
            .with_context(|| format!("Failed to save {}", self.output.display()))?;

        println!("Embedded file: {}", self.output.display());
        println!("  Payload: {} bytes", payload.len());
        println!("  Capacity: {} bytes", max_len);
        println!("  Bits: {}  Channels: {}", self.bits, self.channels);

        Ok(())
    }
}
