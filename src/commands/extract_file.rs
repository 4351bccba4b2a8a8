//! Extract command - recover a file hidden with `embed-file`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stegotool::media::load_rgba;
use stegotool::{BitDepth, BitPlaneCodec, ChannelMask};

use super::{keystream_from, CommandExecutor};

/// Recover a file hidden inside an image.
///
/// Bits, channels and key must match the ones used for embedding. With the
/// wrong settings the output is garbage; if no end marker is found at all,
/// every byte of capacity is written and a warning is printed.
#[derive(Args, Debug)]
pub struct ExtractFileCommand {
    /// Image containing the hidden file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the recovered file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of low bits used per channel (1-8)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// Channels to read: letters ("rgb", "ra") or a sum of r=1, g=2, b=4, a=8
    #[arg(long, default_value = "rgb")]
    pub channels: ChannelMask,

    /// Key used when embedding
    #[arg(short, long)]
    pub key: Option<String>,

    /// Fail instead of writing output when no end marker is found
    #[arg(long)]
    pub strict: bool,
}

impl CommandExecutor for ExtractFileCommand {
    fn execute(&self) -> Result<()> {
        let image = load_rgba(&self.input)
            .with_context(|| format!("Failed to load image {}", self.input.display()))?;

        let codec = BitPlaneCodec::new(BitDepth::new(self.bits)?, self.channels);
        let key = keystream_from(self.key.as_deref())?;
        let extraction = codec.decode(&image, key);

        if !extraction.is_complete() {
            if self.strict {
                anyhow::bail!(
                    "No end-of-data marker found in {}; check bits, channels and key",
                    self.input.display()
                );
            }
            eprintln!("Warning: no end-of-data marker found, writing the whole capacity");
        }

        fs::write(&self.output, extraction.bytes())
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        info!(bytes = extraction.bytes().len(), "file extracted");

        println!("Extracted file: {}", self.output.display());
        println!("  Size: {} bytes", extraction.bytes().len());

        Ok(())
    }
}
