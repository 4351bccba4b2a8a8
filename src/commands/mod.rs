//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod embed_file;
mod embed_image;
mod extract_file;
mod extract_image;
mod image_to_sound;
mod preset;

pub use capacity::CapacityCommand;
pub use embed_file::EmbedFileCommand;
pub use embed_image::EmbedImageCommand;
pub use extract_file::ExtractFileCommand;
pub use extract_image::ExtractImageCommand;
pub use image_to_sound::ImageToSoundCommand;
pub use preset::PresetCommand;

use anyhow::{Context, Result};

use stegotool::Keystream;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Builds the XOR keystream from an optional `--key` argument.
fn keystream_from(key: Option<&str>) -> Result<Keystream> {
    match key {
        Some(key) => Keystream::from_passphrase(key).context("Invalid key"),
        None => Ok(Keystream::default()),
    }
}
