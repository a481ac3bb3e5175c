use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod thumbnail;
pub mod youtube;

pub use thumbnail::{HttpProbe, ThumbnailLocator, UrlProbe};
pub use youtube::YtDlpMetadata;

use crate::transcript::TranscriptResolver;
use crate::{Result, VideoError};

/// Known URL shapes, tried in order. The id ends at `&`, newline, `?` or `#`.
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
    )
    .unwrap()]
});

/// Extract the canonical video id from any supported YouTube URL
pub fn extract_video_id(url: &str) -> std::result::Result<String, VideoError> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| VideoError::Identifier(url.to_string()))
}

/// Trait for looking up video metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the title of the video behind `url`
    async fn fetch_title(&self, url: &str) -> Result<String>;

    /// Get the name of this metadata backend
    fn source_name(&self) -> &'static str;
}

/// Everything known about a video before summarization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// URL exactly as supplied by the caller
    pub video_url: String,

    /// Canonical YouTube id
    pub video_id: String,

    /// Video title reported by the metadata source
    pub title: String,

    /// Caption entries joined with single spaces
    pub transcript: String,

    /// Highest resolution thumbnail that exists
    pub thumbnail_url: Option<String>,
}

impl VideoInfo {
    /// Build a fully populated record or fail on the first missing piece.
    ///
    /// Stages run in order: id, title, transcript, thumbnail. A missing
    /// thumbnail is not a failure.
    pub async fn fetch(
        video_url: &str,
        metadata: &dyn MetadataSource,
        transcripts: &TranscriptResolver,
        thumbnails: &ThumbnailLocator,
    ) -> std::result::Result<Self, VideoError> {
        let video_id = extract_video_id(video_url)?;
        tracing::debug!("Extracted video id {} from {}", video_id, video_url);

        let title = match metadata.fetch_title(video_url).await {
            Ok(title) if !title.trim().is_empty() => title,
            Ok(_) => {
                return Err(VideoError::Title(
                    "Title field missing in metadata".to_string(),
                ))
            }
            Err(e) => return Err(VideoError::Title(format!("{:#}", e))),
        };
        tracing::info!("Found video via {}: {}", metadata.source_name(), title);

        let transcript = transcripts.resolve(&video_id).await?;

        let thumbnail_url = thumbnails.locate(&video_id).await;
        if thumbnail_url.is_none() {
            tracing::warn!("No thumbnail available for video {}", video_id);
        }

        Ok(Self {
            video_url: video_url.to_string(),
            video_id,
            title,
            transcript,
            thumbnail_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{
        CaptionEntry, MockTranscriptSource, TranscriptList, TranscriptSourceError, TranscriptTrack,
    };
    use super::thumbnail::MockUrlProbe;

    #[test]
    fn test_extract_video_id_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_extract_video_id_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/IMslBEcYXhk?si=ZCfbJnddDIx3AglV").unwrap(),
            "IMslBEcYXhk"
        );
        assert_eq!(extract_video_id("youtu.be/abc#frag").unwrap(), "abc");
    }

    #[test]
    fn test_extract_video_id_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/XyZ_-123?autoplay=1").unwrap(),
            "XyZ_-123"
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/first\nsecond").unwrap(),
            "first"
        );
    }

    #[test]
    fn test_extract_video_id_invalid() {
        let err = extract_video_id("https://vimeo.com/123456").unwrap_err();
        assert!(matches!(err, VideoError::Identifier(_)));
        assert!(matches!(
            extract_video_id("https://www.youtube.com/watch?v=").unwrap_err(),
            VideoError::Identifier(_)
        ));
    }

    fn english_manual_track() -> TranscriptTrack {
        TranscriptTrack {
            video_id: "abc".to_string(),
            language_code: "en".to_string(),
            language: "English".to_string(),
            is_generated: false,
            is_translatable: false,
            base_url: "https://example.test/caption".to_string(),
            translation_languages: Vec::new(),
        }
    }

    fn locator_with_nothing() -> ThumbnailLocator {
        let mut probe = MockUrlProbe::new();
        probe.expect_exists().returning(|_| false);
        ThumbnailLocator::new("https://img.youtube.com", Box::new(probe))
    }

    #[tokio::test]
    async fn test_fetch_builds_full_record() {
        let mut metadata = MockMetadataSource::new();
        metadata
            .expect_fetch_title()
            .returning(|_| Ok("Test Video".to_string()));
        metadata.expect_source_name().return_const("mock");

        let mut source = MockTranscriptSource::new();
        source.expect_list_transcripts().returning(|id| {
            Ok(TranscriptList::new(id, vec![english_manual_track()]))
        });
        source.expect_fetch().returning(|_| {
            Ok(vec![CaptionEntry::new("hello", 0.0, 1.0), CaptionEntry::new("world", 1.0, 1.0)])
        });
        let resolver = TranscriptResolver::new(Box::new(source));

        let info = VideoInfo::fetch(
            "https://youtu.be/abc",
            &metadata,
            &resolver,
            &locator_with_nothing(),
        )
        .await
        .unwrap();

        assert_eq!(info.video_id, "abc");
        assert_eq!(info.title, "Test Video");
        assert_eq!(info.transcript, "hello world");
        assert_eq!(info.thumbnail_url, None);
    }

    #[tokio::test]
    async fn test_fetch_title_failure_stops_before_transcript() {
        let mut metadata = MockMetadataSource::new();
        metadata
            .expect_fetch_title()
            .returning(|_| Err(anyhow::anyhow!("yt-dlp failed: boom")));

        let mut source = MockTranscriptSource::new();
        source.expect_list_transcripts().never();
        let resolver = TranscriptResolver::new(Box::new(source));

        let err = VideoInfo::fetch(
            "https://youtu.be/abc",
            &metadata,
            &resolver,
            &locator_with_nothing(),
        )
        .await
        .unwrap_err();

        assert_eq!(err, VideoError::Title("yt-dlp failed: boom".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_empty_title_is_title_error() {
        let mut metadata = MockMetadataSource::new();
        metadata
            .expect_fetch_title()
            .returning(|_| Ok("   ".to_string()));
        let resolver = TranscriptResolver::new(Box::new(MockTranscriptSource::new()));

        let err = VideoInfo::fetch(
            "https://youtu.be/abc",
            &metadata,
            &resolver,
            &locator_with_nothing(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, VideoError::Title(_)));
    }

    #[tokio::test]
    async fn test_fetch_transcript_failure_propagates() {
        let mut metadata = MockMetadataSource::new();
        metadata
            .expect_fetch_title()
            .returning(|_| Ok("Test Video".to_string()));
        metadata.expect_source_name().return_const("mock");

        let mut source = MockTranscriptSource::new();
        source
            .expect_list_transcripts()
            .returning(|id| Err(TranscriptSourceError::TranscriptsDisabled(id.to_string())));
        let resolver = TranscriptResolver::new(Box::new(source));

        let err = VideoInfo::fetch(
            "https://youtu.be/abc",
            &metadata,
            &resolver,
            &locator_with_nothing(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, VideoError::Transcript(_)));
    }
}
