//! Stegotool - hide files and images in pictures, and pictures in sound.
//!
//! A CLI over the `stegotool` library. Outputs are always lossless: PNG for
//! images, uncompressed PCM WAV for audio.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    CapacityCommand, CommandExecutor, EmbedFileCommand, EmbedImageCommand, ExtractFileCommand,
    ExtractImageCommand, ImageToSoundCommand, PresetCommand,
};
use stegotool::logging::{init_logging, LogFormat, LogLevel};

/// Stegotool - image and audio steganography
///
/// Hide any file in the least significant bits of an image, hide an image
/// inside another image, or paint an image into the spectrogram of a sound.
#[derive(Parser)]
#[command(name = "stegotool")]
#[command(version)]
#[command(about = "Image and audio steganography: files in images, images in images, images in sound")]
#[command(long_about = None)]
struct Cli {
    /// Diagnostic log level (written to stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a file in the low bits of an image
    #[command(name = "embed-file")]
    EmbedFile(EmbedFileCommand),

    /// Recover a file hidden with embed-file
    #[command(name = "extract-file")]
    ExtractFile(ExtractFileCommand),

    /// Hide an image in the low bits of another image
    #[command(name = "embed-image")]
    EmbedImage(EmbedImageCommand),

    /// Reveal an image hidden with embed-image
    #[command(name = "extract-image")]
    ExtractImage(ExtractImageCommand),

    /// Render an image into the spectrogram of a WAV file
    #[command(name = "image-to-sound")]
    ImageToSound(ImageToSoundCommand),

    /// Show how many bytes an image can hide
    Capacity(CapacityCommand),

    /// Write a spectrogram preset file with the default settings
    #[command(name = "spectrogram-preset")]
    SpectrogramPreset(PresetCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level.with_verbose(cli.verbose));

    match cli.command {
        Commands::EmbedFile(cmd) => cmd.execute(),
        Commands::ExtractFile(cmd) => cmd.execute(),
        Commands::EmbedImage(cmd) => cmd.execute(),
        Commands::ExtractImage(cmd) => cmd.execute(),
        Commands::ImageToSound(cmd) => cmd.execute(),
        Commands::Capacity(cmd) => cmd.execute(),
        Commands::SpectrogramPreset(cmd) => cmd.execute(),
    }
}
