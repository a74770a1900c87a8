//! Core types for the emotion feature pipeline

use serde::{Deserialize, Serialize};

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 48000)
    pub sample_rate: u32,
}

/// One row of the corpus table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Path of the source recording, as discovered under the input root.
    pub file: String,
    /// Emotion label resolved from the filename.
    pub label: String,
    /// Time-averaged MFCC vector.
    pub features: Vec<f32>,
}

impl SampleRecord {
    pub fn new(file: impl Into<String>, label: impl Into<String>, features: Vec<f32>) -> Self {
        Self {
            file: file.into(),
            label: label.into(),
            features,
        }
    }
}
