//! Capacity command - show how much an image can carry.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegotool::media::load_rgba;
use stegotool::{BitDepth, BitPlaneCodec, ChannelMask};

use super::CommandExecutor;

/// Show how many bytes an image can hide for given bits and channels.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of low bits used per channel (1-8)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// Channels: letters ("rgb", "ra") or a sum of r=1, g=2, b=4, a=8
    #[arg(long, default_value = "rgb")]
    pub channels: ChannelMask,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let image = load_rgba(&self.input)
            .with_context(|| format!("Failed to load image {}", self.input.display()))?;
        let (width, height) = image.dimensions();
        let codec = BitPlaneCodec::new(BitDepth::new(self.bits)?, self.channels);

        println!("Image: {} ({}x{})", self.input.display(), width, height);
        println!("  Bits: {}  Channels: {}", self.bits, self.channels);
        println!("  Raw capacity: {} bits", codec.capacity_bits(width, height));
        println!("  Max file size: {} bytes", codec.max_payload_len(width, height));

        Ok(())
    }
}
