//! Emotion-labeled speech corpus → mean-MFCC feature table → train/test
//! datasets.

pub mod audio;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod features;
pub mod table;
pub mod types;

pub use corpus::{BuildReport, DatasetBuilder, Emotion};
pub use dataset::{DatasetOptions, LabeledTableDataset, Split, VocabularyScope};
pub use error::{PipelineError, Result};
pub use features::{ExtractorConfig, FeatureExtractor};
pub use table::CorpusTable;
pub use types::SampleRecord;
