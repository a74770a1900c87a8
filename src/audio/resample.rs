use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use serde::{Deserialize, Serialize};

const SINC_CHUNK_FRAMES: usize = 1024;
const MAX_FLUSHES: usize = 16;

/// Strategy used to bring decoded audio to the extractor's target rate.
///
/// Passed explicitly to [`crate::features::FeatureExtractor`]; nothing about
/// resampling is configured through process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleMode {
    /// Two-point linear interpolation. Cheapest, lowest fidelity.
    Linear,
    /// Short windowed-sinc filter; fast and approximate.
    #[default]
    SincFast,
    /// Long windowed-sinc filter with dense oversampling.
    SincBest,
}

impl ResampleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::SincFast => "sinc-fast",
            Self::SincBest => "sinc-best",
        }
    }

    fn sinc_parameters(self) -> Option<SincInterpolationParameters> {
        match self {
            Self::Linear => None,
            Self::SincFast => Some(SincInterpolationParameters {
                sinc_len: 64,
                f_cutoff: 0.85,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 64,
                window: WindowFunction::Blackman,
            }),
            Self::SincBest => Some(SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Cubic,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            }),
        }
    }
}

impl fmt::Display for ResampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResampleMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "sinc-fast" | "fast" | "kaiser-fast" => Ok(Self::SincFast),
            "sinc-best" | "best" | "kaiser-best" => Ok(Self::SincBest),
            other => Err(anyhow!(
                "unknown resample mode '{}' (expected linear, sinc-fast or sinc-best)",
                other
            )),
        }
    }
}

/// Resample mono `samples` from `source_rate` to `target_rate` using `mode`.
pub fn resample(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
    mode: ResampleMode,
) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    match mode.sinc_parameters() {
        None => linear_resample(samples, source_rate, target_rate),
        Some(params) => sinc_resample(samples, source_rate, target_rate, params),
    }
}

/// Linearly resample `samples` from `source_rate` to `target_rate`.
pub fn linear_resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() || source_rate == target_rate {
        return Ok(samples.to_vec());
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = expected_len(samples.len(), ratio);
    let last_index = samples.len() - 1;
    let output = (0..output_len)
        .map(|i| {
            let position = i as f64 / ratio;
            let left = (position.floor() as usize).min(last_index);
            let right = (left + 1).min(last_index);
            let t = (position - left as f64) as f32;
            samples[left] * (1.0 - t) + samples[right] * t
        })
        .collect();
    Ok(output)
}

fn sinc_resample(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
    params: SincInterpolationParameters,
) -> Result<Vec<f32>> {
    let ratio = target_rate as f64 / source_rate as f64;
    let expected = expected_len(samples.len(), ratio);
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, SINC_CHUNK_FRAMES, 1)
        .context("failed to construct sinc resampler")?;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected + delay);

    for chunk in samples.chunks(SINC_CHUNK_FRAMES) {
        let input = [chunk];
        let produced = resampler
            .process_partial(Some(&input[..]), None)
            .context("sinc resampling failed")?;
        output.extend(first_channel(produced)?);
    }

    // the filter still holds `delay` frames plus the tail of the input
    let mut flushes = 0;
    while output.len() < delay + expected {
        ensure!(
            flushes < MAX_FLUSHES,
            "sinc resampler did not drain after {} flushes",
            MAX_FLUSHES
        );
        let produced = resampler
            .process_partial::<Vec<f32>>(None, None)
            .context("failed to flush sinc resampler")?;
        output.extend(first_channel(produced)?);
        flushes += 1;
    }

    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}

fn first_channel(mut channels: Vec<Vec<f32>>) -> Result<Vec<f32>> {
    ensure!(
        channels.len() == 1,
        "sinc resampler produced {} channels, expected 1",
        channels.len()
    );
    channels
        .pop()
        .ok_or_else(|| anyhow!("sinc resampler produced no output channel"))
}

fn expected_len(input_len: usize, ratio: f64) -> usize {
    ((input_len as f64) * ratio).ceil().max(1.0) as usize
}
