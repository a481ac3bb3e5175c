use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::extractors::{HttpProbe, MetadataSource, ThumbnailLocator, VideoInfo, YtDlpMetadata};
use crate::llm::{GeminiClient, GeminiImageGenerator, GeneratedImage, ImageGenerator, TextGenerator};
use crate::summary::{PromptComposer, Summarizer};
use crate::transcript::{TranscriptResolver, YoutubeTranscriptSource};
use crate::VideoError;

/// Summary of a video together with what identifies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub title: String,
    pub video_id: String,
    pub thumbnail_url: Option<String>,
}

/// Main summarization pipeline
pub struct VideoPipeline {
    metadata: Box<dyn MetadataSource>,
    transcripts: TranscriptResolver,
    thumbnails: ThumbnailLocator,
    summarizer: Summarizer,
    composer: PromptComposer,
    image_generator: Box<dyn ImageGenerator>,
}

impl VideoPipeline {
    /// Create the pipeline with the real YouTube and Gemini backends
    pub fn new(config: &Config) -> Result<Self> {
        let text: Arc<dyn TextGenerator> = Arc::new(GeminiClient::text(&config.gemini));
        let transcripts = TranscriptResolver::with_languages(
            Box::new(YoutubeTranscriptSource::new()?),
            config.youtube.transcript_languages.clone(),
            &config.youtube.translation_target,
        );

        Ok(Self::from_parts(
            Box::new(YtDlpMetadata::new(&config.youtube.yt_dlp_path)),
            transcripts,
            ThumbnailLocator::new(&config.youtube.thumbnail_host, Box::new(HttpProbe::new())),
            text,
            Box::new(GeminiImageGenerator::new(
                &config.gemini,
                config.image_output_dir()?,
            )),
        ))
    }

    /// Assemble a pipeline from individual collaborators
    pub fn from_parts(
        metadata: Box<dyn MetadataSource>,
        transcripts: TranscriptResolver,
        thumbnails: ThumbnailLocator,
        text_generator: Arc<dyn TextGenerator>,
        image_generator: Box<dyn ImageGenerator>,
    ) -> Self {
        Self {
            metadata,
            transcripts,
            thumbnails,
            summarizer: Summarizer::new(text_generator.clone()),
            composer: PromptComposer::new(text_generator),
            image_generator,
        }
    }

    /// Gather everything about a video; fails fast on the first missing piece
    pub async fn video_info(&self, video_url: &str) -> std::result::Result<VideoInfo, VideoError> {
        VideoInfo::fetch(
            video_url,
            self.metadata.as_ref(),
            &self.transcripts,
            &self.thumbnails,
        )
        .await
    }

    /// Fetch and summarize a video.
    ///
    /// Every failure is logged and turned into `None`.
    pub async fn process_video_from_url(&self, video_url: &str) -> Option<SummaryResult> {
        let info = match self.video_info(video_url).await {
            Ok(info) => info,
            Err(VideoError::Identifier(_)) => {
                tracing::error!("Invalid video ID extracted from {}", video_url);
                return None;
            }
            Err(VideoError::Title(e)) => {
                tracing::error!("Could not retrieve title for {}: {}", video_url, e);
                return None;
            }
            Err(VideoError::Transcript(e)) => {
                tracing::error!("Could not retrieve transcript for {}: {}", video_url, e);
                return None;
            }
        };

        if info.transcript.trim().is_empty() {
            tracing::warn!("No transcript available for {}.", info.title);
            return None;
        }

        tracing::info!(
            "Transcript found ({} characters). Generating summary...",
            info.transcript.chars().count()
        );

        let summary = self.summarizer.summarize(&info.transcript).await;

        Some(SummaryResult {
            summary,
            title: info.title,
            video_id: info.video_id,
            thumbnail_url: info.thumbnail_url,
        })
    }

    /// Compose an image prompt from a summary and hand it to the image generator.
    ///
    /// Image generator errors are returned unchanged.
    pub async fn generate_thumbnail_flow(
        &self,
        summary: &str,
        include_human: bool,
        include_text: bool,
    ) -> Result<GeneratedImage> {
        let image_prompt = self
            .composer
            .compose(summary, include_human, include_text)
            .await;
        tracing::info!("Generated image prompt: {}", image_prompt);

        self.image_generator.generate_image(&image_prompt).await
    }
}
