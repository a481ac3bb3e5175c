use super::{join_entries, TranscriptSource, TranscriptSourceError, TranscriptTrack};
use crate::VideoError;

const NO_ENGLISH_TRANSCRIPT: &str =
    "No English transcript (manual, auto, or translated) could be generated.";

/// Outcome of one transcript tier
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// Joined transcript text
    Found(String),
    /// The tier has nothing for the requested language
    NotFound,
    /// Anything other than "not found"
    Failed(TranscriptSourceError),
}

/// Resolves a transcript through manual, generated and translated tiers
pub struct TranscriptResolver {
    source: Box<dyn TranscriptSource>,
    languages: Vec<String>,
    translation_target: String,
}

impl TranscriptResolver {
    /// Resolver looking for English captions
    pub fn new(source: Box<dyn TranscriptSource>) -> Self {
        Self::with_languages(source, vec!["en".to_string()], "en")
    }

    pub fn with_languages(
        source: Box<dyn TranscriptSource>,
        languages: Vec<String>,
        translation_target: &str,
    ) -> Self {
        Self {
            source,
            languages,
            translation_target: translation_target.to_string(),
        }
    }

    /// Resolve the transcript text of a video.
    ///
    /// A failed listing aborts before any tier runs. Hard failures in the
    /// manual and generated tiers abort as well; failures while translating
    /// only skip the offending track.
    pub async fn resolve(&self, video_id: &str) -> Result<String, VideoError> {
        let transcript_list = self
            .source
            .list_transcripts(video_id)
            .await
            .map_err(unavailable)?;

        tracing::debug!(
            "Found {} transcript tracks for {}",
            transcript_list.len(),
            video_id
        );

        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let manual = self
            .attempt(transcript_list.find_manually_created(&languages))
            .await;
        if let Some(text) = settle("manual", manual)? {
            return Ok(text);
        }

        let generated = self
            .attempt(transcript_list.find_generated(&languages))
            .await;
        if let Some(text) = settle("auto-generated", generated)? {
            return Ok(text);
        }

        for track in transcript_list.iter().filter(|track| track.is_translatable) {
            let attempt = match track.translate(&self.translation_target) {
                Ok(translated) => self.attempt(Ok(&translated)).await,
                Err(e) => classify(e),
            };

            match attempt {
                Attempt::Found(text) => {
                    tracing::info!(
                        "Using {} transcript translated to {}",
                        track.language_code,
                        self.translation_target
                    );
                    return Ok(text);
                }
                Attempt::NotFound => {
                    tracing::debug!("No translation for {} transcript", track.language_code);
                }
                Attempt::Failed(e) => {
                    tracing::debug!(
                        "Skipping {} transcript, translation failed: {}",
                        track.language_code,
                        e
                    );
                }
            }
        }

        Err(VideoError::Transcript(NO_ENGLISH_TRANSCRIPT.to_string()))
    }

    /// Fetch a located track and classify the outcome
    async fn attempt(
        &self,
        located: Result<&TranscriptTrack, TranscriptSourceError>,
    ) -> Attempt {
        let track = match located {
            Ok(track) => track,
            Err(e) => return classify(e),
        };

        match self.source.fetch(track).await {
            Ok(entries) => Attempt::Found(join_entries(&entries)),
            Err(e) => classify(e),
        }
    }
}

fn classify(error: TranscriptSourceError) -> Attempt {
    if error.is_not_found() {
        Attempt::NotFound
    } else {
        Attempt::Failed(error)
    }
}

/// Turn the outcome of a mandatory tier into text, "try next" or a hard error
fn settle(tier: &str, attempt: Attempt) -> Result<Option<String>, VideoError> {
    match attempt {
        Attempt::Found(text) => {
            tracing::info!("Using {} transcript", tier);
            Ok(Some(text))
        }
        Attempt::NotFound => {
            tracing::debug!("No {} transcript", tier);
            Ok(None)
        }
        Attempt::Failed(e) => Err(unavailable(e)),
    }
}

fn unavailable(error: TranscriptSourceError) -> VideoError {
    VideoError::Transcript(format!("Transcript unavailable: {}", error))
}
