//! Integration tests for Stegotool
//!
//! Note: extraction NEVER fails - wrong settings produce garbage, and a
//! missing end marker is reported through `Extraction::SentinelNotFound`.

use std::io::Cursor;

use hound::WavReader;
use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use stegotool::media::{
    load_rgb, load_rgba, rgba_from_bytes, rgba_to_png_bytes, save_png, wav_bytes, write_wav,
};
use stegotool::stego::synthesize;
use stegotool::{
    BitDepth, BitPlaneCodec, ChannelMask, Extraction, Keystream, QuantizeCodec, SpectrogramConfig,
    SpectrogramSynthesizer, StegoError,
};
use tempfile::tempdir;

fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([
            ((x * 7) % 256) as u8,
            ((y * 11) % 256) as u8,
            ((x * y) % 256) as u8,
            255,
        ])
    })
}

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([((x * 5) % 256) as u8, ((y * 9) % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn file_codec(bits: u8, channels: &str) -> BitPlaneCodec {
    BitPlaneCodec::new(BitDepth::new(bits).unwrap(), channels.parse().unwrap())
}

/// Test a file survives embedding, PNG encoding and extraction
#[test]
fn test_file_roundtrip_through_png() {
    let payload: Vec<u8> = (0..1500).map(|i| (i * 37 % 255 + 1) as u8).collect();
    let mut carrier = gradient_rgba(100, 80);
    let codec = file_codec(3, "rgb");
    let key = Keystream::from_passphrase("correct horse").unwrap();

    codec.encode(&payload, &mut carrier, key.clone()).unwrap();

    let png = rgba_to_png_bytes(&carrier).unwrap();
    let reloaded = rgba_from_bytes(&png).unwrap();

    assert_eq!(codec.decode(&reloaded, key), Extraction::Complete(payload));
}

/// Test files on disk, the way the CLI uses them
#[test]
fn test_file_roundtrip_on_disk() {
    let dir = tempdir().unwrap();
    let carrier_path = dir.path().join("carrier.png");
    let stego_path = dir.path().join("stego.png");

    save_png(&gradient_rgba(64, 64), &carrier_path).unwrap();

    let payload = b"#!/bin/sh\necho hidden\n".to_vec();
    let codec = file_codec(2, "15");
    let mut carrier = load_rgba(&carrier_path).unwrap();
    codec
        .encode_with_rng(
            &payload,
            &mut carrier,
            Keystream::default(),
            &mut ChaCha20Rng::seed_from_u64(42),
        )
        .unwrap();
    save_png(&carrier, &stego_path).unwrap();

    let stego = load_rgba(&stego_path).unwrap();
    assert_eq!(codec.decode(&stego, Keystream::default()).into_bytes(), payload);
}

/// Test that a different key gives different bytes (not an error)
#[test]
fn test_wrong_key_returns_garbage() {
    let payload = b"meet me under the clock tower".to_vec();
    let mut carrier = gradient_rgba(48, 48);
    let codec = file_codec(1, "rgba");

    codec
        .encode(&payload, &mut carrier, Keystream::from_passphrase("alpha").unwrap())
        .unwrap();

    let wrong = codec.decode(&carrier, Keystream::from_passphrase("bravo").unwrap());
    assert_eq!(wrong.bytes().len(), payload.len());
    assert_ne!(wrong.bytes(), payload.as_slice());
}

/// Test decoding with mismatched bit depth does not panic
#[test]
fn test_wrong_bits_never_fails() {
    let mut carrier = gradient_rgba(40, 40);
    file_codec(4, "rgb")
        .encode(b"payload", &mut carrier, Keystream::default())
        .unwrap();

    let extraction = file_codec(1, "rgb").decode(&carrier, Keystream::default());
    assert_ne!(extraction.bytes(), b"payload");
}

/// Test the capacity boundary: exactly full fits, one more byte fails untouched
#[test]
fn test_capacity_boundary() {
    for (bits, channels) in [(1, "r"), (3, "gb"), (7, "rgba")] {
        let codec = file_codec(bits, channels);
        let max = codec.max_payload_len(30, 20) as usize;

        let mut carrier = gradient_rgba(30, 20);
        let payload = vec![0xC3; max];
        codec.encode(&payload, &mut carrier, Keystream::default()).unwrap();
        assert_eq!(
            codec.decode(&carrier, Keystream::default()),
            Extraction::Complete(payload)
        );

        let original = gradient_rgba(30, 20);
        let mut carrier = original.clone();
        let err = codec
            .encode(&vec![0xC3; max + 1], &mut carrier, Keystream::default())
            .unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(carrier, original);
    }
}

/// Test an empty payload still noise-pads a full image
#[test]
fn test_empty_payload() {
    let mut carrier = gradient_rgba(20, 20);
    let codec = file_codec(2, "rgb");
    codec.encode(&[], &mut carrier, Keystream::default()).unwrap();

    assert_eq!(carrier.dimensions(), (20, 20));
    assert_eq!(
        codec.decode(&carrier, Keystream::default()),
        Extraction::Complete(Vec::new())
    );
}

/// Test an image with no embedded data reports a missing sentinel
#[test]
fn test_unmarked_image_reports_missing_sentinel() {
    let carrier = RgbaImage::from_pixel(16, 16, Rgba([1, 1, 1, 1]));
    let extraction = file_codec(1, "rgba").decode(&carrier, Keystream::default());
    assert!(!extraction.is_complete());
    assert_eq!(extraction.bytes().len(), 16 * 16 * 4 / 8);
}

/// Test image-in-image through files on disk
#[test]
fn test_image_in_image_on_disk() {
    let dir = tempdir().unwrap();
    let stego_path = dir.path().join("stego.png");
    let revealed_path = dir.path().join("revealed.png");

    let mut carrier = gradient_rgb(50, 40);
    let secret = RgbImage::from_fn(50, 40, |x, _| {
        if x % 2 == 0 {
            Rgb([255, 0, 255])
        } else {
            Rgb([0, 255, 0])
        }
    });

    let codec = QuantizeCodec::new(BitDepth::new(1).unwrap(), ChannelMask::RGB);
    codec.encode(&mut carrier, &secret);
    save_png(&carrier, &stego_path).unwrap();

    let revealed = codec.decode(&load_rgb(&stego_path).unwrap());
    save_png(&revealed, &revealed_path).unwrap();

    assert_eq!(load_rgb(&revealed_path).unwrap(), secret);
}

/// Test the spectrogram output length and WAV framing
#[test]
fn test_spectrogram_to_wav() {
    let image = gradient_rgb(12, 16);
    let config = SpectrogramConfig {
        sines: 16,
        samples_per_column: 100,
        bits_per_sample: 16,
        ..Default::default()
    };

    let pcm = synthesize(&image, &config).unwrap();
    assert_eq!(pcm.data().len(), 12 * 100 * 2);

    let reader = WavReader::new(Cursor::new(wav_bytes(&pcm).unwrap())).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.spec().sample_rate, 44_100);
    let samples: Vec<i32> = reader.into_samples::<i32>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, pcm.samples().collect::<Vec<_>>());
}

/// Test every PCM width writes a readable WAV file
#[test]
fn test_spectrogram_all_bit_depths() {
    let dir = tempdir().unwrap();
    let image = gradient_rgb(3, 8);

    for bits in [8u16, 16, 24, 32] {
        let config = SpectrogramConfig {
            sines: 4,
            samples_per_column: 50,
            bits_per_sample: bits,
            ..Default::default()
        };
        let pcm = SpectrogramSynthesizer::new(config).unwrap().synthesize(&image);
        assert_eq!(pcm.data().len(), 3 * 50 * usize::from(bits / 8));

        let path = dir.path().join(format!("out{}.wav", bits));
        write_wav(&pcm, &path).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().bits_per_sample, bits);
        assert_eq!(reader.len() as usize, 150);
    }
}

/// Test invalid spectrogram settings are rejected before any output
#[test]
fn test_spectrogram_rejects_bad_settings() {
    let image = gradient_rgb(4, 4);
    let config = SpectrogramConfig {
        base_freq: 30_000.0,
        sample_rate: 44_100,
        ..Default::default()
    };
    let err = synthesize(&image, &config).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, StegoError::Nyquist { .. }));
}

/// Test a preset written to disk drives the synthesizer
#[test]
fn test_preset_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preset.toml");

    let config = SpectrogramConfig {
        base_freq: 500.0,
        top_freq: 4000.0,
        exponent: 1.5,
        sines: 8,
        samples_per_column: 20,
        volume_db: 6.0,
        bits_per_sample: 8,
        sample_rate: 22_050,
    };
    config.save(&path).unwrap();

    let loaded = SpectrogramConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let pcm = synthesize(&gradient_rgb(5, 5), &loaded).unwrap();
    assert_eq!(pcm.sample_rate(), 22_050);
    assert_eq!(pcm.sample_count(), 100);
}
