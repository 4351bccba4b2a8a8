//! Preset command - write a spectrogram preset file to edit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegotool::SpectrogramConfig;

use super::CommandExecutor;

/// Write the default spectrogram settings as a TOML preset.
#[derive(Args, Debug)]
pub struct PresetCommand {
    /// Preset file to create
    #[arg(short, long, default_value = "spectrogram.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl CommandExecutor for PresetCommand {
    fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists; use --force to overwrite",
                self.output.display()
            );
        }

        SpectrogramConfig::default()
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Preset written: {}", self.output.display());

        Ok(())
    }
}
