use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::audio::ResampleMode;
use crate::dataset::{DatasetOptions, Split, VocabularyScope};
use crate::error::{PipelineError, Result};
use crate::features::{
    ExtractorConfig, DEFAULT_FFT_SIZE, DEFAULT_HOP_SIZE, DEFAULT_MEL_BANDS, DEFAULT_N_MFCC,
    DEFAULT_SAMPLE_RATE,
};

pub const DEFAULT_INPUT_ROOT: &str = "data/raw/RAVDESS";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed/RAVDESS";
pub const DEFAULT_OUTPUT_FILE: &str = "ravdess_features.msgpack";
pub const DEFAULT_SPLIT_RATIO: f64 = 0.8;

/// Every knob of the pipeline. Missing entries in a config file fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input_root: PathBuf,
    pub output_dir: PathBuf,
    pub output_file: String,
    pub sample_rate: u32,
    pub n_mfcc: usize,
    pub mel_bands: usize,
    pub fft_size: usize,
    pub hop_size: usize,
    pub resample_mode: ResampleMode,
    pub split_ratio: f64,
    pub vocabulary: VocabularyScope,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            n_mfcc: DEFAULT_N_MFCC,
            mel_bands: DEFAULT_MEL_BANDS,
            fft_size: DEFAULT_FFT_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            resample_mode: ResampleMode::default(),
            split_ratio: DEFAULT_SPLIT_RATIO,
            vocabulary: VocabularyScope::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file; defaults apply when `path` is `None`.
    pub fn from_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| PipelineError::io(path, err))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|err| {
            PipelineError::InvalidConfig(format!("failed to parse config JSON: {}", err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.split_ratio) {
            return Err(PipelineError::InvalidConfig(format!(
                "split_ratio must be within [0, 1], got {}",
                self.split_ratio
            )));
        }
        if self.output_file.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "output_file must not be empty".into(),
            ));
        }
        self.extractor_config().validate()
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            sample_rate: self.sample_rate,
            n_mfcc: self.n_mfcc,
            mel_bands: self.mel_bands,
            fft_size: self.fft_size,
            hop_size: self.hop_size,
            resample_mode: self.resample_mode,
        }
    }

    /// Split options seeded from `split_ratio` and `vocabulary`.
    pub fn dataset_options(&self, split: Split) -> DatasetOptions {
        DatasetOptions::new(split, self.split_ratio).with_vocabulary(self.vocabulary)
    }
}
