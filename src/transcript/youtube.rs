use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

use super::parser::parse_timedtext;
use super::{
    CaptionEntry, TranscriptList, TranscriptSource, TranscriptSourceError, TranscriptTrack,
    TranslationLanguage,
};

const YOUTUBE_URL: &str = "https://www.youtube.com";
const CONSENT_MARKER: &str = "action=\"https://consent.youtube.com/s\"";

static INNERTUBE_API_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());
static CONSENT_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"name="v" value="(.*?)""#).unwrap());

type SourceResult<T> = Result<T, TranscriptSourceError>;

/// Caption tracks straight from YouTube's watch page and innertube player API
pub struct YoutubeTranscriptSource {
    client: Client,
    cookies: Arc<Jar>,
    base_url: String,
}

impl YoutubeTranscriptSource {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(YOUTUBE_URL)
    }

    pub fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            cookies,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn watch_url(&self, video_id: &str) -> String {
        format!(
            "{}/watch?v={}",
            self.base_url,
            urlencoding::encode(video_id)
        )
    }

    async fn fetch_video_html(&self, video_id: &str) -> SourceResult<String> {
        let url = self.watch_url(video_id);
        let html = self.get_text(&url, video_id).await?;

        let Some(consent) = consent_value(&html, video_id)? else {
            return Ok(html);
        };

        tracing::debug!("Accepting YouTube consent page for {}", video_id);
        self.set_consent_cookie(&consent, video_id)?;

        let html = self.get_text(&url, video_id).await?;
        if html.contains(CONSENT_MARKER) {
            return Err(TranscriptSourceError::ConsentCookie(video_id.to_string()));
        }

        Ok(html)
    }

    async fn get_text(&self, url: &str, video_id: &str) -> SourceResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranscriptSourceError::Http(format!("Failed to fetch {}: {}", url, e)))?;

        check_http_errors(&response, video_id)?;

        response
            .text()
            .await
            .map_err(|e| TranscriptSourceError::Http(format!("Failed to read {}: {}", url, e)))
    }

    fn set_consent_cookie(&self, value: &str, video_id: &str) -> SourceResult<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|_| TranscriptSourceError::ConsentCookie(video_id.to_string()))?;
        let domain = url.host_str().unwrap_or("youtube.com");
        self.cookies
            .add_cookie_str(&format!("CONSENT=YES+{}; Domain={}", value, domain), &url);

        Ok(())
    }

    async fn fetch_innertube_data(&self, video_id: &str, api_key: &str) -> SourceResult<Value> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            TranscriptSourceError::Http(format!("Failed to fetch innertube data: {}", e))
        })?;

        check_http_errors(&response, video_id)?;

        response.json().await.map_err(|e| {
            TranscriptSourceError::Parse(format!("Failed to parse innertube response: {}", e))
        })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn list_transcripts(&self, video_id: &str) -> SourceResult<TranscriptList> {
        tracing::debug!("Listing transcripts for {}", video_id);

        let html = self.fetch_video_html(video_id).await?;
        let api_key = extract_innertube_api_key(&html, video_id)?;
        let innertube_data = self.fetch_innertube_data(video_id, &api_key).await?;

        parse_caption_tracks(video_id, &innertube_data)
    }

    async fn fetch(&self, track: &TranscriptTrack) -> SourceResult<Vec<CaptionEntry>> {
        if track.base_url.contains("&exp=xpe") {
            return Err(TranscriptSourceError::PoTokenRequired(track.video_id.clone()));
        }

        tracing::debug!(
            "Fetching {} transcript for {}",
            track.language_code,
            track.video_id
        );

        let xml = self.get_text(&track.base_url, &track.video_id).await?;
        let entries = parse_timedtext(&xml);
        if entries.is_empty() && !xml.contains("<transcript") {
            return Err(TranscriptSourceError::Parse(format!(
                "Caption response for {} is not timedtext XML",
                track.video_id
            )));
        }

        Ok(entries)
    }
}

fn check_http_errors(response: &Response, video_id: &str) -> SourceResult<()> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptSourceError::IpBlocked(video_id.to_string()));
    }
    if !status.is_success() {
        return Err(TranscriptSourceError::Http(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )));
    }
    Ok(())
}

/// Consent token of a consent interstitial, `None` for a regular watch page
pub fn consent_value(html: &str, video_id: &str) -> SourceResult<Option<String>> {
    if !html.contains(CONSENT_MARKER) {
        return Ok(None);
    }

    CONSENT_VALUE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|value| Some(value.as_str().to_string()))
        .ok_or_else(|| TranscriptSourceError::ConsentCookie(video_id.to_string()))
}

/// Find the innertube API key embedded in the watch page
pub fn extract_innertube_api_key(html: &str, video_id: &str) -> SourceResult<String> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(TranscriptSourceError::IpBlocked(video_id.to_string()));
    }

    INNERTUBE_API_KEY
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|key| key.as_str().to_string())
        .ok_or_else(|| {
            TranscriptSourceError::Parse(format!("No innertube API key on watch page of {}", video_id))
        })
}

/// Map a non-OK `playabilityStatus` to the matching error
pub fn assert_playability(video_id: &str, innertube_data: &Value) -> SourceResult<()> {
    let Some(playability) = innertube_data.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability["status"].as_str().unwrap_or("");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability["reason"].as_str().unwrap_or("");
    match status {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(TranscriptSourceError::RequestBlocked(video_id.to_string()))
        }
        "LOGIN_REQUIRED" if reason.contains("inappropriate for some users") => {
            Err(TranscriptSourceError::AgeRestricted(video_id.to_string()))
        }
        "ERROR" if reason.contains("unavailable") => {
            Err(TranscriptSourceError::VideoUnavailable(video_id.to_string()))
        }
        _ => Err(TranscriptSourceError::VideoUnplayable(
            video_id.to_string(),
            reason.to_string(),
        )),
    }
}

/// Build the track listing from an innertube player response
pub fn parse_caption_tracks(video_id: &str, innertube_data: &Value) -> SourceResult<TranscriptList> {
    assert_playability(video_id, innertube_data)?;

    let renderer = innertube_data
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .ok_or_else(|| TranscriptSourceError::TranscriptsDisabled(video_id.to_string()))?;

    let translation_languages: Vec<TranslationLanguage> = renderer["translationLanguages"]
        .as_array()
        .map(|languages| {
            languages
                .iter()
                .filter_map(|lang| {
                    Some(TranslationLanguage {
                        language_code: lang["languageCode"].as_str()?.to_string(),
                        language: run_text(&lang["languageName"])?,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let tracks: Vec<TranscriptTrack> = renderer["captionTracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|caption| {
                    let language_code = caption["languageCode"].as_str()?.to_string();
                    let base_url = caption["baseUrl"].as_str()?.replace("&fmt=srv3", "");
                    let is_translatable = caption["isTranslatable"].as_bool().unwrap_or(false);

                    Some(TranscriptTrack {
                        video_id: video_id.to_string(),
                        language: run_text(&caption["name"]).unwrap_or_else(|| language_code.clone()),
                        is_generated: caption["kind"].as_str() == Some("asr"),
                        is_translatable,
                        base_url,
                        translation_languages: if is_translatable {
                            translation_languages.clone()
                        } else {
                            Vec::new()
                        },
                        language_code,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptSourceError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(TranscriptList::new(video_id, tracks))
}

/// Text of `{"runs": [{"text": ..}]}` or `{"simpleText": ..}`
fn run_text(value: &Value) -> Option<String> {
    value["runs"][0]["text"]
        .as_str()
        .or_else(|| value["simpleText"].as_str())
        .map(str::to_string)
}
