mod mfcc;

use std::path::Path;

use anyhow::Context;
use ndarray::Array1;

use crate::audio::{decoder, resample, ResampleMode};
use crate::error::{PipelineError, Result};
use crate::types::AudioData;
use mfcc::FrameParams;

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub const DEFAULT_N_MFCC: usize = 40;
pub const DEFAULT_MEL_BANDS: usize = 128;
pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_HOP_SIZE: usize = 512;

/// Parameters that fix the shape and content of every extracted vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    pub sample_rate: u32,
    pub n_mfcc: usize,
    pub mel_bands: usize,
    pub fft_size: usize,
    pub hop_size: usize,
    pub resample_mode: ResampleMode,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            n_mfcc: DEFAULT_N_MFCC,
            mel_bands: DEFAULT_MEL_BANDS,
            fft_size: DEFAULT_FFT_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            resample_mode: ResampleMode::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfig(msg));
        if self.sample_rate == 0 {
            return invalid("sample_rate must be positive".into());
        }
        if self.n_mfcc == 0 {
            return invalid("n_mfcc must be positive".into());
        }
        if self.n_mfcc > self.mel_bands {
            return invalid(format!(
                "n_mfcc ({}) cannot exceed mel_bands ({})",
                self.n_mfcc, self.mel_bands
            ));
        }
        if self.fft_size == 0 || self.hop_size == 0 {
            return invalid("fft_size and hop_size must be positive".into());
        }
        if self.hop_size > self.fft_size {
            return invalid(format!(
                "hop_size ({}) cannot exceed fft_size ({})",
                self.hop_size, self.fft_size
            ));
        }
        Ok(())
    }

    fn frame_params(&self) -> FrameParams {
        FrameParams {
            sample_rate: self.sample_rate,
            fft_size: self.fft_size,
            hop_size: self.hop_size,
            mel_bands: self.mel_bands,
            n_mfcc: self.n_mfcc,
        }
    }
}

/// Turns one recording into a fixed-length, time-averaged MFCC vector.
///
/// Stateless apart from its configuration, so a single extractor can be
/// reused for any number of files in any order.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Output vector length.
    pub fn feature_dim(&self) -> usize {
        self.config.n_mfcc
    }

    /// Decode `path` and return its mean MFCC vector.
    ///
    /// Every decode or analysis problem comes back as
    /// [`PipelineError::DecodeFailure`] naming the file.
    pub fn extract(&self, path: &Path) -> Result<Array1<f32>> {
        decoder::decode_audio(path)
            .and_then(|audio| self.extract_from_audio(&audio))
            .map_err(|err| PipelineError::DecodeFailure {
                path: path.to_path_buf(),
                message: format!("{:#}", err),
            })
    }

    /// Same as [`extract`](Self::extract) for audio already in memory.
    pub fn extract_samples(&self, audio: &AudioData) -> Result<Array1<f32>> {
        self.extract_from_audio(audio)
            .map_err(|err| PipelineError::DecodeFailure {
                path: "<memory>".into(),
                message: format!("{:#}", err),
            })
    }

    fn extract_from_audio(&self, audio: &AudioData) -> anyhow::Result<Array1<f32>> {
        let mono = resample::resample(
            &audio.samples,
            audio.sample_rate,
            self.config.sample_rate,
            self.config.resample_mode,
        )
        .with_context(|| {
            format!(
                "failed to resample audio from {} Hz to {} Hz",
                audio.sample_rate, self.config.sample_rate
            )
        })?;
        let matrix = mfcc::mfcc_matrix(&mono, self.config.frame_params())?;
        mfcc::time_mean(&matrix)
    }
}
