use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::audio::ResampleMode;
use crate::config::PipelineConfig;
use crate::dataset::{DatasetOptions, Split, VocabularyScope};

#[derive(Parser, Debug)]
#[command(
    name = "emotion-prep",
    version,
    about = "Extract mean-MFCC feature tables from emotion-labeled speech recordings"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk the input corpus and write the feature table.
    Prepare(PrepareArgs),
    /// Summarize a feature table written by `prepare`.
    Inspect(InspectArgs),
    /// Show the size and label mapping of one train/test split.
    Split(SplitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PrepareArgs {
    /// JSON config file; flags below override its entries.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Root directory holding one subdirectory per actor.
    #[arg(long, value_name = "DIR")]
    pub input_root: Option<PathBuf>,
    /// Directory the feature table is written to.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// File name of the feature table (`.json` selects JSON, otherwise MessagePack).
    #[arg(long, value_name = "NAME")]
    pub output_file: Option<String>,
    /// Target sample rate in Hz.
    #[arg(long)]
    pub sample_rate: Option<u32>,
    /// Number of MFCC coefficients per vector.
    #[arg(long)]
    pub n_mfcc: Option<usize>,
    /// Resampling strategy: linear, sinc-fast or sinc-best.
    #[arg(long, value_name = "MODE")]
    pub resample_mode: Option<ResampleMode>,
    /// Rows of the finished table to print.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

impl PrepareArgs {
    /// Resolve defaults, the optional config file and flag overrides.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::from_override(self.config.as_deref())
            .context("Failed to load pipeline config")?;
        if let Some(root) = &self.input_root {
            config.input_root = root.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(file) = &self.output_file {
            config.output_file = file.clone();
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(n_mfcc) = self.n_mfcc {
            config.n_mfcc = n_mfcc;
        }
        if let Some(mode) = self.resample_mode {
            config.resample_mode = mode;
        }
        config.validate().context("Invalid pipeline configuration")?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Feature table to summarize.
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,
    /// Rows to print.
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Feature table to split.
    #[arg(value_name = "ARTIFACT")]
    pub artifact: PathBuf,
    /// JSON file supplying `split_ratio` and `vocabulary`.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// `train` selects the leading rows; any other value selects the rest.
    #[arg(long, default_value = "train")]
    pub split: String,
    /// Fraction of rows assigned to the train split [default: 0.8].
    #[arg(long)]
    pub ratio: Option<f64>,
    /// Derive label ids from the whole table instead of the selected split.
    #[arg(long)]
    pub corpus_vocabulary: bool,
}

impl SplitArgs {
    /// Defaults, then the config file, then flags.
    pub fn dataset_options(&self) -> Result<DatasetOptions> {
        let config = PipelineConfig::from_override(self.config.as_deref())
            .context("Failed to load pipeline config")?;
        let mut options = config.dataset_options(Split::from_selector(&self.split));
        if let Some(ratio) = self.ratio {
            options.ratio = ratio;
        }
        if self.corpus_vocabulary {
            options.vocabulary = VocabularyScope::Corpus;
        }
        Ok(options)
    }
}
