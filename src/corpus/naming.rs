use std::fmt;
use std::path::Path;

use crate::error::{PipelineError, Result};

pub const AUDIO_SUFFIX: &str = ".wav";
const TOKEN_DELIMITER: char = '-';
const EMOTION_TOKEN_INDEX: usize = 2;

/// The eight portrayed emotions, keyed by their two-digit filename code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgust,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Neutral,
        Emotion::Calm,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgust,
        Emotion::Surprised,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Neutral),
            "02" => Some(Self::Calm),
            "03" => Some(Self::Happy),
            "04" => Some(Self::Sad),
            "05" => Some(Self::Angry),
            "06" => Some(Self::Fearful),
            "07" => Some(Self::Disgust),
            "08" => Some(Self::Surprised),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Neutral => "01",
            Self::Calm => "02",
            Self::Happy => "03",
            Self::Sad => "04",
            Self::Angry => "05",
            Self::Fearful => "06",
            Self::Disgust => "07",
            Self::Surprised => "08",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Calm => "calm",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Fearful => "fearful",
            Self::Disgust => "disgust",
            Self::Surprised => "surprised",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|emotion| emotion.label() == label)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when the file name ends in `.wav`. Case-sensitive: `.WAV` is ignored.
pub fn has_audio_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(AUDIO_SUFFIX))
}

/// Resolve the emotion encoded in a recording's file name.
///
/// The name is split on `-`; the third token is the emotion code. Fewer than
/// three tokens is [`PipelineError::MalformedName`], an unknown code is
/// [`PipelineError::UnrecognizedLabel`].
pub fn parse_emotion(file_name: &str) -> Result<Emotion> {
    let tokens: Vec<&str> = file_name.split(TOKEN_DELIMITER).collect();
    let code = tokens
        .get(EMOTION_TOKEN_INDEX)
        .ok_or_else(|| PipelineError::MalformedName {
            name: file_name.to_string(),
        })?;
    Emotion::from_code(code).ok_or_else(|| PipelineError::UnrecognizedLabel {
        code: code.to_string(),
    })
}
