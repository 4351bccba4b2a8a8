//! Image-to-sound command - render an image into a WAV spectrogram.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use stegotool::media::{load_rgb, write_wav};
use stegotool::{SpectrogramConfig, SpectrogramSynthesizer};

use super::CommandExecutor;

/// Encode an image into the spectrogram of a WAV file.
///
/// Settings come from the defaults, then from `--config` if given, then from
/// any flag passed explicitly.
#[derive(Args, Debug)]
pub struct ImageToSoundCommand {
    /// Image to render
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output WAV path
    #[arg(short, long)]
    pub output: PathBuf,

    /// TOML preset with spectrogram settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frequency of the bottom of the image, in Hz
    #[arg(long)]
    pub base_freq: Option<f64>,

    /// Frequency of the top of the image, in Hz
    #[arg(long)]
    pub top_freq: Option<f64>,

    /// Mapping exponent; 1 is linear
    #[arg(long)]
    pub exponent: Option<f64>,

    /// Number of sine waves mixed per column
    #[arg(long)]
    pub sines: Option<u32>,

    /// Samples used for each image column (1000-5000 is usually good)
    #[arg(long)]
    pub samples_per_column: Option<u32>,

    /// Attenuation of the theoretical peak, in dB
    #[arg(long)]
    pub volume: Option<f64>,

    /// PCM bit depth: 8, 16, 24 or 32
    #[arg(long)]
    pub bits_per_sample: Option<u16>,

    /// Samples per second
    #[arg(long)]
    pub sample_rate: Option<u32>,
}

impl ImageToSoundCommand {
    /// Merges preset and explicit flags into one config.
    fn resolve_config(&self) -> Result<SpectrogramConfig> {
        let mut config = match &self.config {
            Some(path) => SpectrogramConfig::load(path)
                .with_context(|| format!("Failed to load preset {}", path.display()))?,
            None => SpectrogramConfig::default(),
        };

        if let Some(v) = self.base_freq {
            config.base_freq = v;
        }
        if let Some(v) = self.top_freq {
            config.top_freq = v;
        }
        if let Some(v) = self.exponent {
            config.exponent = v;
        }
        if let Some(v) = self.sines {
            config.sines = v;
        }
        if let Some(v) = self.samples_per_column {
            config.samples_per_column = v;
        }
        if let Some(v) = self.volume {
            config.volume_db = v;
        }
        if let Some(v) = self.bits_per_sample {
            config.bits_per_sample = v;
        }
        if let Some(v) = self.sample_rate {
            config.sample_rate = v;
        }

        Ok(config)
    }
}

impl CommandExecutor for ImageToSoundCommand {
    fn execute(&self) -> Result<()> {
        let config = self.resolve_config()?;
        let synth = SpectrogramSynthesizer::new(config).context("Invalid spectrogram settings")?;

        if synth.config().amplitude() == 0 {
            warn!(
                sines = synth.config().sines,
                bits = synth.config().bits_per_sample,
                "tone amplitude is zero, output will be silent; use fewer sines or more bits"
            );
        }

        let image = load_rgb(&self.input)
            .with_context(|| format!("Failed to load image {}", self.input.display()))?;

        let pcm = synth.synthesize(&image);
        write_wav(&pcm, &self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        info!(samples = pcm.sample_count(), "audio written");

        println!("Wrote audio: {}", self.output.display());
        println!("  Duration: {:.2}s", pcm.duration_secs());
        println!(
            "  Format: {}-bit mono, {} Hz",
            pcm.bits_per_sample(),
            pcm.sample_rate()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn command() -> ImageToSoundCommand {
        ImageToSoundCommand {
            input: PathBuf::from("in.png"),
            output: PathBuf::from("out.wav"),
            config: None,
            base_freq: None,
            top_freq: None,
            exponent: None,
            sines: None,
            samples_per_column: None,
            volume: None,
            bits_per_sample: None,
            sample_rate: None,
        }
    }

    #[test]
    fn test_flags_override_preset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preset.toml");
        std::fs::write(&path, "top_freq = 12000.0\nsines = 64\n").unwrap();

        let mut cmd = command();
        cmd.config = Some(path);
        cmd.sines = Some(16);

        let config = cmd.resolve_config().unwrap();
        assert_eq!(config.top_freq, 12000.0);
        assert_eq!(config.sines, 16);
        assert_eq!(config.base_freq, SpectrogramConfig::default().base_freq);
    }

    #[test]
    fn test_defaults_without_preset() {
        assert_eq!(command().resolve_config().unwrap(), SpectrogramConfig::default());
    }
}
