//! The persisted corpus table and its on-disk format.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::SampleRecord;

pub const COLUMN_NAMES: [&str; 3] = ["file", "label", "features"];

/// Serialization chosen from the artifact's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    MessagePack,
    Json,
}

impl ArtifactFormat {
    /// `.json` selects JSON; every other extension is MessagePack.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::MessagePack,
        }
    }
}

/// Column-oriented layout written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct TableColumns {
    file: Vec<String>,
    label: Vec<String>,
    features: Vec<Vec<f32>>,
}

/// Ordered rows of extracted features. Row order is insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusTable {
    rows: Vec<SampleRecord>,
}

impl CorpusTable {
    /// Build a table from rows, rejecting mixed feature widths.
    pub fn from_rows(rows: Vec<SampleRecord>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let width = first.features.len();
            if let Some((index, row)) = rows
                .iter()
                .enumerate()
                .find(|(_, row)| row.features.len() != width)
            {
                return Err(PipelineError::Schema(format!(
                    "row {} has {} features, expected {}",
                    index,
                    row.features.len(),
                    width
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SampleRecord] {
        &self.rows
    }

    /// Shared feature width, `None` for an empty table.
    pub fn feature_dim(&self) -> Option<usize> {
        self.rows.first().map(|row| row.features.len())
    }

    /// First `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[SampleRecord] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Row count per label, sorted by label.
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_bytes(&self, format: ArtifactFormat) -> Result<Vec<u8>> {
        let columns = self.to_columns();
        match format {
            ArtifactFormat::MessagePack => rmp_serde::to_vec_named(&columns)
                .map_err(|err| PipelineError::Serialization(err.to_string())),
            ArtifactFormat::Json => serde_json::to_vec(&columns)
                .map_err(|err| PipelineError::Serialization(err.to_string())),
        }
    }

    pub fn from_bytes(bytes: &[u8], format: ArtifactFormat) -> Result<Self> {
        let columns: TableColumns = match format {
            ArtifactFormat::MessagePack => rmp_serde::from_slice(bytes)
                .map_err(|err| PipelineError::Serialization(err.to_string()))?,
            ArtifactFormat::Json => serde_json::from_slice(bytes)
                .map_err(|err| PipelineError::Serialization(err.to_string()))?,
        };
        Self::from_columns(columns)
    }

    /// Write the table to `path`, replacing any existing artifact.
    ///
    /// Bytes go to a sibling temp file first and are renamed into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes(ArtifactFormat::for_path(path))?;
        let staging = staging_path(path);
        fs::write(&staging, &bytes).map_err(|err| PipelineError::io(&staging, err))?;
        fs::rename(&staging, path).map_err(|err| {
            let _ = fs::remove_file(&staging);
            PipelineError::io(path, err)
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|err| PipelineError::io(path, err))?;
        Self::from_bytes(&bytes, ArtifactFormat::for_path(path))
    }

    fn to_columns(&self) -> TableColumns {
        let mut columns = TableColumns {
            file: Vec::with_capacity(self.rows.len()),
            label: Vec::with_capacity(self.rows.len()),
            features: Vec::with_capacity(self.rows.len()),
        };
        for row in &self.rows {
            columns.file.push(row.file.clone());
            columns.label.push(row.label.clone());
            columns.features.push(row.features.clone());
        }
        columns
    }

    fn from_columns(columns: TableColumns) -> Result<Self> {
        let TableColumns {
            file,
            label,
            features,
        } = columns;
        if file.len() != label.len() || file.len() != features.len() {
            return Err(PipelineError::Schema(format!(
                "column lengths differ: file={}, label={}, features={}",
                file.len(),
                label.len(),
                features.len()
            )));
        }
        let rows = file
            .into_iter()
            .zip(label)
            .zip(features)
            .map(|((file, label), features)| SampleRecord {
                file,
                label,
                features,
            })
            .collect();
        Self::from_rows(rows)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
