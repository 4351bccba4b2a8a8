//! Extract-image command - reveal a picture hidden with `embed-image`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegotool::media::{load_rgb, save_png};
use stegotool::{BitDepth, ChannelMask, QuantizeCodec};

use super::CommandExecutor;

/// Retrieve a hidden image and normalize it for viewing.
#[derive(Args, Debug)]
pub struct ExtractImageCommand {
    /// Image containing the hidden picture
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of low bits used per channel (1-8)
    #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// Channels to read: letters ("rgb") or a sum of r=1, g=2, b=4 (alpha is ignored)
    #[arg(long, default_value = "rgb")]
    pub channels: ChannelMask,
}

impl CommandExecutor for ExtractImageCommand {
    fn execute(&self) -> Result<()> {
        let image = load_rgb(&self.input)
            .with_context(|| format!("Failed to load image {}", self.input.display()))?;

        let codec = QuantizeCodec::new(BitDepth::new(self.bits)?, self.channels);
        let revealed = codec.decode(&image);

        save_png(&revealed, &self.output)
            .with_context(|| format!("Failed to save {}", self.output.display()))?;

        println!("Extracted image: {}", self.output.display());

        Ok(())
    }
}
