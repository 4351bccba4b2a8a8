//! Image to audio synthesis: the picture shows up in a spectrogram.
//!
//! Every image column becomes `samples_per_column` PCM samples. Within a
//! column, `sines` tones are mixed, each weighted by the luminance of the
//! image row that maps to its frequency. The bottom of the image sits at
//! `base_freq`, the top at `top_freq`.

use std::f64::consts::TAU;

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::StegoError;

/// Default bottom frequency of the image in Hz.
pub const DEFAULT_BASE_FREQ: f64 = 1000.0;

/// Default top frequency of the image in Hz.
pub const DEFAULT_TOP_FREQ: f64 = 8000.0;

/// Default number of tones per column.
pub const DEFAULT_SINES: u32 = 256;

/// Default number of samples rendered per image column.
pub const DEFAULT_SAMPLES_PER_COLUMN: u32 = 2000;

/// Default attenuation of the theoretical peak in dB.
pub const DEFAULT_VOLUME_DB: f64 = 3.0;

/// Default PCM sample width.
pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Parameters of the image-to-spectrogram synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Frequency of the bottom image row, in Hz.
    pub base_freq: f64,

    /// Frequency of the top image row, in Hz.
    pub top_freq: f64,

    /// Mapping exponent; 1.0 is linear, larger values compress low tones.
    pub exponent: f64,

    /// Number of sine tones mixed per column.
    pub sines: u32,

    /// Samples rendered for each image column.
    pub samples_per_column: u32,

    /// Attenuation of the theoretical peak, in dB. The sign is ignored.
    pub volume_db: f64,

    /// PCM sample width: 8, 16, 24 or 32.
    pub bits_per_sample: u16,

    /// Samples per second.
    pub sample_rate: u32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            base_freq: DEFAULT_BASE_FREQ,
            top_freq: DEFAULT_TOP_FREQ,
            exponent: 1.0,
            sines: DEFAULT_SINES,
            samples_per_column: DEFAULT_SAMPLES_PER_COLUMN,
            volume_db: DEFAULT_VOLUME_DB,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl SpectrogramConfig {
    /// Checks every precondition of the synthesis.
    pub fn validate(&self) -> Result<(), StegoError> {
        if self.sample_rate == 0 {
            return Err(StegoError::NoSampleRate);
        }

        let nyquist = f64::from(self.sample_rate / 2);
        for (which, freq) in [("Base", self.base_freq), ("Top", self.top_freq)] {
            if freq < 0.0 {
                return Err(StegoError::NegativeFrequency(freq));
            }
            if freq > nyquist {
                return Err(StegoError::Nyquist {
                    which,
                    freq,
                    nyquist,
                });
            }
        }

        if !(self.top_freq > self.base_freq) {
            return Err(StegoError::InvertedRange {
                base: self.base_freq,
                top: self.top_freq,
            });
        }
        if !(self.exponent > 0.0) {
            return Err(StegoError::InvalidExponent(self.exponent));
        }
        if self.bits_per_sample == 0 || self.bits_per_sample % 8 != 0 || self.bits_per_sample > 32 {
            return Err(StegoError::InvalidPcmDepth(self.bits_per_sample));
        }
        if self.sines == 0 {
            return Err(StegoError::NoSines);
        }
        if self.samples_per_column == 0 {
            return Err(StegoError::NoSamples);
        }
        Ok(())
    }

    /// Position of tone `w` along the `[0, 1)` mapping curve.
    fn curve(&self, w: u32) -> f64 {
        (f64::from(w) / f64::from(self.sines)).powf(self.exponent)
    }

    /// Frequency of tone `w` in Hz.
    pub fn frequency(&self, w: u32) -> f64 {
        self.base_freq + self.curve(w) * (self.top_freq - self.base_freq)
    }

    /// Peak amplitude of a single tone, chosen so all tones together can't clip.
    pub fn amplitude(&self) -> i64 {
        let full_scale = 2f64.powi(i32::from(self.bits_per_sample));
        let attenuation = 10f64.powf(self.volume_db.abs() / 10.0);
        let peak = (full_scale / attenuation) as i64 / 2;
        peak / i64::from(self.sines)
    }

    /// Zero-signal value of the unsigned mixing representation.
    pub fn bias(&self) -> i64 {
        1i64 << (self.bits_per_sample - 1)
    }

    /// Largest unsigned sample value.
    fn max_sample(&self) -> i64 {
        (1i64 << self.bits_per_sample) - 1
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }
}

/// Perceived brightness of an sRGB color, in `[0, 1]`.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| (f64::from(c) / 255.0).powf(2.2);
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// One pure tone stored as biased unsigned samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub frequency: f64,
    samples: Vec<u32>,
}

impl Tone {
    pub fn samples(&self) -> &[u32] {
        &self.samples
    }
}

/// Pre-rendered tones, one per frequency band.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneTable {
    bias: i64,
    tones: Vec<Tone>,
}

impl ToneTable {
    /// Renders every tone of `config`. The config is assumed valid.
    pub fn new(config: &SpectrogramConfig) -> Self {
        let amplitude = config.amplitude() as f64;
        let bias = config.bias();
        let max = config.max_sample();
        let rate = f64::from(config.sample_rate);

        let tones = (0..config.sines)
            .into_par_iter()
            .map(|w| {
                let frequency = config.frequency(w);
                let period = rate / frequency;
                let samples = (0..config.samples_per_column)
                    .map(|x| {
                        let s = (f64::from(x) / (period / TAU)).sin();
                        ((s * amplitude) as i64 + bias).clamp(0, max) as u32
                    })
                    .collect();
                Tone { frequency, samples }
            })
            .collect();

        Self { bias, tones }
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }
}

/// Luminance weight of every tone for image column `x`.
///
/// Row 0 is the top of the image and the top of the frequency range, so
/// tone positions are measured upward from the last row.
pub fn column_weights(image: &RgbImage, x: u32, config: &SpectrogramConfig) -> Vec<f64> {
    let height = image.height();
    if height == 0 {
        return vec![0.0; config.sines as usize];
    }
    let last = height - 1;
    let row_luminance = |row: u32| {
        let [r, g, b] = image.get_pixel(x, row).0;
        luminance(r, g, b)
    };

    (0..config.sines)
        .map(|w| {
            let point = config.curve(w) * f64::from(last);
            let step = point.trunc() as u32;
            let low = row_luminance(last.saturating_sub(step));
            let high = row_luminance(last.saturating_sub(step + 1));
            let t = point.fract();
            (1.0 - t) * low + t * high
        })
        .collect()
}

/// Mixes the weighted tones of one column into biased unsigned samples.
fn mix_column(tones: &ToneTable, weights: &[f64], len: usize) -> Vec<i64> {
    let mut mixed = vec![tones.bias; len];
    for (tone, weight) in tones.tones.iter().zip(weights) {
        for (slot, sample) in mixed.iter_mut().zip(&tone.samples) {
            *slot += ((i64::from(*sample) - tones.bias) as f64 * weight) as i64;
        }
    }
    mixed
}

/// Converts biased samples to the output layout.
///
/// 8-bit PCM is unsigned; wider PCM is little-endian two's complement.
fn pack_samples(mixed: &[i64], config: &SpectrogramConfig) -> Vec<u8> {
    let width = config.bytes_per_sample();
    let bias = config.bias();
    let max = config.max_sample();
    let mut out = Vec::with_capacity(mixed.len() * width);
    for &value in mixed {
        let value = value.clamp(0, max);
        if config.bits_per_sample == 8 {
            out.push(value as u8);
        } else {
            out.extend_from_slice(&(value - bias).to_le_bytes()[..width]);
        }
    }
    out
}

/// Mono PCM audio produced by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    bits_per_sample: u16,
    sample_rate: u32,
    data: Vec<u8>,
}

impl PcmBuffer {
    pub fn new(bits_per_sample: u16, sample_rate: u32, data: Vec<u8>) -> Self {
        Self {
            bits_per_sample,
            sample_rate,
            data,
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Raw frames in WAV data-chunk layout.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8).max(1)
    }

    pub fn sample_count(&self) -> usize {
        self.data.len() / self.bytes_per_sample()
    }

    pub fn duration_secs(&self) -> f64 {
        self.sample_count() as f64 / f64::from(self.sample_rate.max(1))
    }

    /// Samples as signed values centered on zero.
    pub fn samples(&self) -> impl Iterator<Item = i32> + '_ {
        let bits = self.bits_per_sample;
        self.data
            .chunks_exact(self.bytes_per_sample())
            .map(move |frame| match bits {
                8 => i32::from(frame[0]) - 128,
                16 => i32::from(i16::from_le_bytes([frame[0], frame[1]])),
                24 => i32::from_le_bytes([0, frame[0], frame[1], frame[2]]) >> 8,
                _ => i32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]),
            })
    }
}

/// Renders images as audio whose spectrogram shows the image.
#[derive(Debug, Clone)]
pub struct SpectrogramSynthesizer {
    config: SpectrogramConfig,
    tones: ToneTable,
}

impl SpectrogramSynthesizer {
    /// Validates `config` and pre-renders its tones.
    pub fn new(config: SpectrogramConfig) -> Result<Self, StegoError> {
        config.validate()?;
        let tones = ToneTable::new(&config);
        debug!(
            sines = config.sines,
            amplitude = config.amplitude(),
            bits = config.bits_per_sample,
            "tone table ready"
        );
        Ok(Self { config, tones })
    }

    pub fn config(&self) -> &SpectrogramConfig {
        &self.config
    }

    pub fn tones(&self) -> &ToneTable {
        &self.tones
    }

    /// Synthesizes the whole image, columns left to right.
    pub fn synthesize(&self, image: &RgbImage) -> PcmBuffer {
        let len = self.config.samples_per_column as usize;

        let columns: Vec<Vec<u8>> = (0..image.width())
            .into_par_iter()
            .map(|x| {
                let weights = column_weights(image, x, &self.config);
                let mixed = mix_column(&self.tones, &weights, len);
                pack_samples(&mixed, &self.config)
            })
            .collect();

        let data = columns.concat();
        debug!(columns = image.width(), bytes = data.len(), "synthesis finished");
        PcmBuffer::new(self.config.bits_per_sample, self.config.sample_rate, data)
    }
}

/// Validates `config` and synthesizes `image` in one call.
pub fn synthesize(image: &RgbImage, config: &SpectrogramConfig) -> Result<PcmBuffer, StegoError> {
    Ok(SpectrogramSynthesizer::new(config.clone())?.synthesize(image))
}
