use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Thumbnail resolutions from best to worst
pub const RESOLUTIONS: [&str; 5] = [
    "maxresdefault", // 1280x720
    "sddefault",     // 640x480
    "hqdefault",     // 480x360
    "mqdefault",     // 320x180
    "default",       // 120x90
];

/// Existence check for a remote resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// True when the URL answers with HTTP 200
    async fn exists(&self, url: &str) -> bool;
}

/// Probe backed by HEAD requests
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    async fn exists(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!("Thumbnail probe failed for {}: {}", url, e);
                false
            }
        }
    }
}

/// Finds the best thumbnail YouTube serves for a video
pub struct ThumbnailLocator {
    host: String,
    probe: Box<dyn UrlProbe>,
}

impl ThumbnailLocator {
    pub fn new(host: &str, probe: Box<dyn UrlProbe>) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            probe,
        }
    }

    /// Thumbnail URL for one resolution
    pub fn thumbnail_url(&self, video_id: &str, resolution: &str) -> String {
        format!("{}/vi/{}/{}.jpg", self.host, video_id, resolution)
    }

    /// Return the first resolution that exists, or `None` when all of them fail
    pub async fn locate(&self, video_id: &str) -> Option<String> {
        for resolution in RESOLUTIONS {
            let url = self.thumbnail_url(video_id, resolution);
            if self.probe.exists(&url).await {
                tracing::debug!("Using {} thumbnail for {}", resolution, video_id);
                return Some(url);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;

    #[test]
    fn test_thumbnail_url_template() {
        let locator = ThumbnailLocator::new("https://img.youtube.com/", Box::new(MockUrlProbe::new()));
        assert_eq!(
            locator.thumbnail_url("abc", "hqdefault"),
            "https://img.youtube.com/vi/abc/hqdefault.jpg"
        );
    }

    #[tokio::test]
    async fn test_locate_falls_through_to_default() {
        let mut probe = MockUrlProbe::new();
        let mut seq = Sequence::new();
        for resolution in RESOLUTIONS {
            let url = format!("https://img.youtube.com/vi/abc/{}.jpg", resolution);
            let available = resolution == "default";
            probe
                .expect_exists()
                .with(eq(url))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(available);
        }

        let locator = ThumbnailLocator::new("https://img.youtube.com", Box::new(probe));
        assert_eq!(
            locator.locate("abc").await,
            Some("https://img.youtube.com/vi/abc/default.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_locate_stops_at_first_hit() {
        let mut probe = MockUrlProbe::new();
        probe
            .expect_exists()
            .withf(|url: &str| url.ends_with("maxresdefault.jpg"))
            .times(1)
            .return_const(true);

        let locator = ThumbnailLocator::new("https://img.youtube.com", Box::new(probe));
        assert_eq!(
            locator.locate("abc").await,
            Some("https://img.youtube.com/vi/abc/maxresdefault.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_locate_returns_none_when_nothing_exists() {
        let mut probe = MockUrlProbe::new();
        probe.expect_exists().times(5).return_const(false);

        let locator = ThumbnailLocator::new("https://img.youtube.com", Box::new(probe));
        assert_eq!(locator.locate("abc").await, None);
    }
}
