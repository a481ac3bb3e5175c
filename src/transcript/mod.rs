use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod parser;
pub mod resolver;
pub mod youtube;

pub use resolver::{Attempt, TranscriptResolver};
pub use youtube::YoutubeTranscriptSource;

/// Errors reported by a transcript backend
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptSourceError {
    #[error("No transcript found for {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("Video {0} is unplayable: {1}")]
    VideoUnplayable(String, String),

    #[error("YouTube is blocking requests for {0} (bot check)")]
    RequestBlocked(String),

    #[error("YouTube is blocking requests from this IP for {0}")]
    IpBlocked(String),

    #[error("Video {0} is age restricted")]
    AgeRestricted(String),

    #[error("Transcript for {0} requires a PO token")]
    PoTokenRequired(String),

    #[error("Transcript {language_code} of {video_id} is not translatable")]
    NotTranslatable {
        video_id: String,
        language_code: String,
    },

    #[error("Translation language {0} is not available")]
    TranslationLanguageNotAvailable(String),

    #[error("Failed to create consent cookie for {0}")]
    ConsentCookie(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unparsable YouTube data: {0}")]
    Parse(String),
}

impl TranscriptSourceError {
    /// True for "this language does not exist", as opposed to hard failures
    pub fn is_not_found(&self) -> bool {
        matches!(self, TranscriptSourceError::NoTranscriptFound { .. })
    }
}

/// One caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl CaptionEntry {
    pub fn new(text: &str, start: f64, duration: f64) -> Self {
        Self {
            text: text.to_string(),
            start,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    pub language: String,
    pub language_code: String,
}

/// A caption track listed for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    pub video_id: String,
    pub language_code: String,

    /// Display name, e.g. "English (auto-generated)"
    pub language: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    pub base_url: String,
    pub translation_languages: Vec<TranslationLanguage>,
}

impl TranscriptTrack {
    /// Derive the machine translated variant of this track
    pub fn translate(&self, language_code: &str) -> Result<TranscriptTrack, TranscriptSourceError> {
        if !self.is_translatable {
            return Err(TranscriptSourceError::NotTranslatable {
                video_id: self.video_id.clone(),
                language_code: self.language_code.clone(),
            });
        }

        let target = self
            .translation_languages
            .iter()
            .find(|lang| lang.language_code == language_code)
            .ok_or_else(|| {
                TranscriptSourceError::TranslationLanguageNotAvailable(language_code.to_string())
            })?;

        Ok(TranscriptTrack {
            video_id: self.video_id.clone(),
            language_code: target.language_code.clone(),
            language: target.language.clone(),
            is_generated: true,
            is_translatable: false,
            base_url: format!("{}&tlang={}", self.base_url, target.language_code),
            translation_languages: Vec::new(),
        })
    }
}

/// Every track of a video, in the order YouTube lists them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptList {
    pub video_id: String,
    tracks: Vec<TranscriptTrack>,
}

impl TranscriptList {
    pub fn new(video_id: &str, tracks: Vec<TranscriptTrack>) -> Self {
        Self {
            video_id: video_id.to_string(),
            tracks,
        }
    }

    pub fn find_manually_created(
        &self,
        language_codes: &[&str],
    ) -> Result<&TranscriptTrack, TranscriptSourceError> {
        self.find(language_codes, false)
    }

    pub fn find_generated(
        &self,
        language_codes: &[&str],
    ) -> Result<&TranscriptTrack, TranscriptSourceError> {
        self.find(language_codes, true)
    }

    fn find(
        &self,
        language_codes: &[&str],
        generated: bool,
    ) -> Result<&TranscriptTrack, TranscriptSourceError> {
        language_codes
            .iter()
            .find_map(|code| {
                self.tracks
                    .iter()
                    .find(|track| track.is_generated == generated && track.language_code == *code)
            })
            .ok_or_else(|| TranscriptSourceError::NoTranscriptFound {
                video_id: self.video_id.clone(),
                languages: language_codes.iter().map(|s| s.to_string()).collect(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptTrack> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Trait for listing and downloading caption tracks
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List every caption track of a video
    async fn list_transcripts(&self, video_id: &str)
        -> Result<TranscriptList, TranscriptSourceError>;

    /// Download the entries of one track
    async fn fetch(&self, track: &TranscriptTrack) -> Result<Vec<CaptionEntry>, TranscriptSourceError>;
}

/// Concatenate entries with single spaces, in order
pub fn join_entries(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
