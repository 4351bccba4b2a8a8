//! Image and WAV file handling for the codecs.
//!
//! Images are decoded with the `image` crate and always written back as
//! PNG: any lossy format would destroy the embedded low bits. Audio is
//! written as mono integer PCM with `hound`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{ImageBuffer, ImageFormat, PixelWithColorType, RgbImage, RgbaImage};
use thiserror::Error;

use crate::stego::PcmBuffer;

/// Errors that can occur while loading or saving media.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("Audio save error: {0}")]
    AudioSaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reads a whole payload file into memory.
pub fn read_payload<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, MediaError> {
    Ok(fs::read(path)?)
}

/// Loads an image from disk as 8-bit RGBA.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage, MediaError> {
    let image = image::open(path).map_err(|e| MediaError::ImageLoadError(e.to_string()))?;
    Ok(image.to_rgba8())
}

/// Loads an image from disk as 8-bit RGB, dropping any alpha.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, MediaError> {
    let image = image::open(path).map_err(|e| MediaError::ImageLoadError(e.to_string()))?;
    Ok(image.to_rgb8())
}

/// Decodes an in-memory image as 8-bit RGBA.
pub fn rgba_from_bytes(bytes: &[u8]) -> Result<RgbaImage, MediaError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| MediaError::ImageLoadError(e.to_string()))?;
    Ok(image.to_rgba8())
}

/// Saves an image as PNG regardless of the path's extension.
pub fn save_png<Px, P>(image: &ImageBuffer<Px, Vec<u8>>, path: P) -> Result<(), MediaError>
where
    Px: PixelWithColorType<Subpixel = u8>,
    P: AsRef<Path>,
{
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| MediaError::ImageSaveError(e.to_string()))
}

/// Encodes an RGBA image as PNG bytes.
pub fn rgba_to_png_bytes(image: &RgbaImage) -> Result<Vec<u8>, MediaError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| MediaError::ImageSaveError(e.to_string()))?;
    Ok(bytes)
}

fn wav_spec(pcm: &PcmBuffer) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: pcm.sample_rate(),
        bits_per_sample: pcm.bits_per_sample(),
        sample_format: SampleFormat::Int,
    }
}

/// Writes a PCM buffer to a WAV file.
pub fn write_wav<P: AsRef<Path>>(pcm: &PcmBuffer, path: P) -> Result<(), MediaError> {
    let mut writer = WavWriter::create(path, wav_spec(pcm))
        .map_err(|e| MediaError::AudioSaveError(e.to_string()))?;

    for sample in pcm.samples() {
        writer
            .write_sample(sample)
            .map_err(|e| MediaError::AudioSaveError(e.to_string()))?;
    }

    writer
        .finalize()
        .map_err(|e| MediaError::AudioSaveError(e.to_string()))?;

    Ok(())
}

/// Returns a PCM buffer as WAV bytes.
pub fn wav_bytes(pcm: &PcmBuffer) -> Result<Vec<u8>, MediaError> {
    let mut bytes = Vec::new();
    {
        let cursor = Cursor::new(&mut bytes);
        let mut writer = WavWriter::new(cursor, wav_spec(pcm))
            .map_err(|e| MediaError::AudioSaveError(e.to_string()))?;

        for sample in pcm.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| MediaError::AudioSaveError(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| MediaError::AudioSaveError(e.to_string()))?;
    }
    Ok(bytes)
}
