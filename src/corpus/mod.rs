//! Walks an actor-per-directory recording tree into a [`CorpusTable`].

pub mod naming;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::features::FeatureExtractor;
use crate::table::CorpusTable;
use crate::types::SampleRecord;

pub use naming::{parse_emotion, Emotion};

/// Tally of one corpus run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Actor directories visited.
    pub actors: usize,
    /// Files carrying the audio extension.
    pub audio_files: usize,
    /// Rows written to the table.
    pub extracted: usize,
    pub malformed: usize,
    pub unrecognized: usize,
    /// Eligible files whose decode or feature extraction failed.
    pub failed: usize,
    /// Where the table was written; `None` until persisted.
    pub artifact: Option<PathBuf>,
}

impl BuildReport {
    pub fn skipped(&self) -> usize {
        self.malformed + self.unrecognized + self.failed
    }
}

/// Offline builder that turns an input root into a persisted corpus table.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    input_root: PathBuf,
    output_path: PathBuf,
    extractor: FeatureExtractor,
}

impl DatasetBuilder {
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        extractor: FeatureExtractor,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_path: output_path.into(),
            extractor,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        let extractor = FeatureExtractor::new(config.extractor_config())?;
        Ok(Self::new(
            config.input_root.clone(),
            config.output_path(),
            extractor,
        ))
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Walk the input root and extract every eligible file into a table.
    ///
    /// Per-file problems are logged and counted, never returned. Fails with
    /// [`PipelineError::MissingInputRoot`] or [`PipelineError::EmptyCorpus`].
    pub fn collect(&self) -> Result<(CorpusTable, BuildReport)> {
        if !self.input_root.is_dir() {
            return Err(PipelineError::MissingInputRoot(self.input_root.clone()));
        }
        info!(root = %self.input_root.display(), "scanning corpus");

        let mut report = BuildReport::default();
        let mut rows = Vec::new();

        let actors = sorted_children(&self.input_root, |entry| entry.file_type().is_dir());
        for actor in actors {
            report.actors += 1;
            info!(actor = %actor.file_name().to_string_lossy(), "processing actor directory");
            let recordings = sorted_children(actor.path(), |entry| {
                entry.file_type().is_file() && naming::has_audio_extension(entry.path())
            });
            for recording in recordings {
                report.audio_files += 1;
                match self.process_file(recording.path()) {
                    Ok(row) => {
                        report.extracted += 1;
                        rows.push(row);
                    }
                    Err(err) if err.is_per_file() => {
                        record_skip(&mut report, recording.path(), &err)
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        if rows.is_empty() {
            return Err(PipelineError::EmptyCorpus {
                root: self.input_root.clone(),
            });
        }
        let table = CorpusTable::from_rows(rows)?;
        Ok((table, report))
    }

    /// Collect the corpus and persist it, overwriting any previous artifact.
    pub fn build(&self) -> Result<BuildReport> {
        let (table, mut report) = self.collect()?;
        if let Some(parent) = self
            .output_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|err| PipelineError::io(parent, err))?;
        }
        table.save(&self.output_path)?;
        info!(
            artifact = %self.output_path.display(),
            rows = table.len(),
            "saved corpus table"
        );
        report.artifact = Some(self.output_path.clone());
        Ok(report)
    }

    fn process_file(&self, path: &Path) -> Result<SampleRecord> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let emotion = parse_emotion(&file_name)?;
        let features = self.extractor.extract(path)?;
        debug!(file = %path.display(), label = emotion.label(), "extracted features");
        Ok(SampleRecord::new(
            path.to_string_lossy(),
            emotion.label(),
            features.to_vec(),
        ))
    }
}

fn record_skip(report: &mut BuildReport, path: &Path, err: &PipelineError) {
    match err {
        PipelineError::MalformedName { .. } => {
            report.malformed += 1;
            warn!(file = %path.display(), "skipping malformed filename");
        }
        PipelineError::UnrecognizedLabel { code } => {
            report.unrecognized += 1;
            trace!(file = %path.display(), code = %code, "skipping unrecognized emotion code");
        }
        _ => {
            report.failed += 1;
            warn!(file = %path.display(), error = %err, "failed to process recording");
        }
    }
}

/// Immediate children of `dir` that pass `keep`, sorted by file name.
fn sorted_children(dir: &Path, keep: impl Fn(&DirEntry) -> bool) -> Vec<DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "unreadable directory entry");
                None
            }
        })
        .filter(|entry| keep(entry))
        .collect()
}
