//! Indexable train/test view over a persisted corpus table.

mod vocabulary;

use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::Deserialize;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::table::CorpusTable;

pub use vocabulary::LabelVocabulary;

/// Which contiguous partition of the table a dataset exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// `"train"` selects the prefix; any other selector means test.
    pub fn from_selector(selector: &str) -> Self {
        if selector == "train" {
            Self::Train
        } else {
            Self::Test
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }
}

/// Where the label-to-id mapping is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabularyScope {
    /// Only the labels present in the selected split. Train and test ids may
    /// disagree when their label sets differ.
    #[default]
    PerSplit,
    /// Every label in the table, so both splits share one mapping.
    Corpus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetOptions {
    pub split: Split,
    pub ratio: f64,
    pub vocabulary: VocabularyScope,
}

impl DatasetOptions {
    pub fn new(split: Split, ratio: f64) -> Self {
        Self {
            split,
            ratio,
            vocabulary: VocabularyScope::PerSplit,
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: VocabularyScope) -> Self {
        self.vocabulary = vocabulary;
        self
    }
}

/// Row index where the test partition starts: `floor(total * ratio)`.
pub fn split_boundary(total: usize, ratio: f64) -> usize {
    ((total as f64 * ratio).floor() as usize).min(total)
}

/// One split of a corpus table with integer-encoded labels.
///
/// The whole split is materialized on construction and never mutated, so
/// shared references can be read from several threads.
#[derive(Debug, Clone)]
pub struct LabeledTableDataset {
    split: Split,
    files: Vec<String>,
    features: Array2<f32>,
    label_ids: Vec<usize>,
    vocabulary: LabelVocabulary,
}

impl LabeledTableDataset {
    /// Open `path` with a per-split vocabulary.
    pub fn open(path: &Path, selector: &str, ratio: f64) -> Result<Self> {
        Self::open_with(path, DatasetOptions::new(Split::from_selector(selector), ratio))
    }

    pub fn open_with(path: &Path, options: DatasetOptions) -> Result<Self> {
        let table = CorpusTable::load(path)?;
        debug!(
            artifact = %path.display(),
            rows = table.len(),
            split = options.split.as_str(),
            "loaded corpus table"
        );
        Self::from_table(&table, options)
    }

    pub fn from_table(table: &CorpusTable, options: DatasetOptions) -> Result<Self> {
        if !(0.0..=1.0).contains(&options.ratio) {
            return Err(PipelineError::InvalidConfig(format!(
                "split ratio must be within [0, 1], got {}",
                options.ratio
            )));
        }
        let boundary = split_boundary(table.len(), options.ratio);
        let rows = match options.split {
            Split::Train => &table.rows()[..boundary],
            Split::Test => &table.rows()[boundary..],
        };

        let vocabulary = match options.vocabulary {
            VocabularyScope::PerSplit => {
                LabelVocabulary::from_labels(rows.iter().map(|row| row.label.as_str()))
            }
            VocabularyScope::Corpus => {
                LabelVocabulary::from_labels(table.rows().iter().map(|row| row.label.as_str()))
            }
        };

        let dim = table.feature_dim().unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * dim);
        let mut label_ids = Vec::with_capacity(rows.len());
        let mut files = Vec::with_capacity(rows.len());
        for row in rows {
            flat.extend_from_slice(&row.features);
            let id = vocabulary.id(&row.label).ok_or_else(|| {
                PipelineError::Schema(format!("label {:?} missing from vocabulary", row.label))
            })?;
            label_ids.push(id);
            files.push(row.file.clone());
        }
        let features = Array2::from_shape_vec((rows.len(), dim), flat)
            .map_err(|err| PipelineError::Schema(err.to_string()))?;

        Ok(Self {
            split: options.split,
            files,
            features,
            label_ids,
            vocabulary,
        })
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn len(&self) -> usize {
        self.label_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_ids.is_empty()
    }

    /// Feature vector and label id of the `index`-th row of this split.
    pub fn get(&self, index: usize) -> Result<(ArrayView1<'_, f32>, usize)> {
        let label = *self
            .label_ids
            .get(index)
            .ok_or(PipelineError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        Ok((self.features.index_axis(Axis(0), index), label))
    }

    /// Source path of the `index`-th row.
    pub fn file(&self, index: usize) -> Option<&str> {
        self.files.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, f32>, usize)> + '_ {
        self.features
            .outer_iter()
            .zip(self.label_ids.iter().copied())
    }

    /// All feature vectors of the split as a `(len, feature_dim)` matrix.
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    pub fn label_ids(&self) -> &[usize] {
        &self.label_ids
    }

    pub fn feature_dim(&self) -> usize {
        self.features.len_of(Axis(1))
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    pub fn labels(&self) -> &[String] {
        self.vocabulary.labels()
    }

    pub fn label_count(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn label_id(&self, label: &str) -> Option<usize> {
        self.vocabulary.id(label)
    }

    pub fn label_name(&self, id: usize) -> Option<&str> {
        self.vocabulary.name(id)
    }
}
