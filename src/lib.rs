//! yt-digest - A Rust CLI tool for summarizing YouTube videos
//!
//! This library fetches a video's title, thumbnail and transcript, summarizes the
//! transcript with Gemini and can generate a fresh thumbnail from that summary.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod summary;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{extract_video_id, MetadataSource, VideoInfo};
pub use llm::{GeneratedImage, ImageGenerator, TextGenerator};
pub use pipeline::{SummaryResult, VideoPipeline};
pub use transcript::{TranscriptResolver, TranscriptSource};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Failures while assembling a [`VideoInfo`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    #[error("Could not extract a valid YouTube ID from the URL: {0}")]
    Identifier(String),

    #[error("Failed to retrieve title via yt-dlp: {0}")]
    Title(String),

    #[error("{0}")]
    Transcript(String),
}
