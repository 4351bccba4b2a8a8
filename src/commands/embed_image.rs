//! Embed-image command - hide one picture inside another.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegotool::media::{load_rgb, save_png};
use stegotool::{BitDepth, ChannelMask, QuantizeCodec};

use super::CommandExecutor;

/// Hide a secret image in the low bits of a base image.
///
/// The secret is resized to the base image's dimensions when they differ.
#[derive(Args, Debug)]
pub struct EmbedImageCommand {
    /// Base (carrier) image
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Image to hide
    #[arg(short, long)]
    pub secret: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of low bits used per channel (1-8)
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// Channels to write: letters ("rgb") or a sum of r=1, g=2, b=4 (alpha is ignored)
    #[arg(long, default_value = "rgb")]
    pub channels: ChannelMask,
}

impl CommandExecutor for EmbedImageCommand {
    fn execute(&self) -> Result<()> {
        let mut carrier = load_rgb(&self.carrier)
            .with_context(|| format!("Failed to load base image {}", self.carrier.display()))?;
        let secret = load_rgb(&self.secret)
            .with_context(|| format!("Failed to load secret image {}", self.secret.display()))?;

        let codec = QuantizeCodec::new(BitDepth::new(self.bits)?, self.channels);
        if codec.mask().is_empty() {
            anyhow::bail!("No RGB channel selected; nothing would be embedded");
        }
        codec.encode(&mut carrier, &secret);

        save_png(&carrier, &self.output)
            .with_context(|| format!("Failed to save {}", self.output.display()))?;

        println!("Embedded image: {}", self.output.display());
        println!("  Size: {}x{}", carrier.width(), carrier.height());
        println!("  Bits: {}  Channels: {}", self.bits, codec.mask());

        Ok(())
    }
}
