use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;

use super::MetadataSource;
use crate::Result;

/// YouTube metadata lookup using yt-dlp
pub struct YtDlpMetadata {
    yt_dlp_path: String,
}

impl YtDlpMetadata {
    pub fn new(yt_dlp_path: &str) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.to_string(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Get video information using yt-dlp, metadata only
    async fn get_video_info(&self, url: &str) -> Result<Value> {
        tracing::debug!("Extracting video info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--dump-json",
                "--skip-download",
                "--no-playlist",
                "--quiet",
                "--no-warnings",
                url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        let json_str = String::from_utf8(output.stdout)?;
        let info: Value = serde_json::from_str(&json_str)?;

        Ok(info)
    }
}

/// Pull a non-empty title out of yt-dlp's info dict
pub fn parse_title(info: &Value) -> Result<String> {
    info["title"]
        .as_str()
        .filter(|title| !title.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Title field missing in metadata"))
}

#[async_trait]
impl MetadataSource for YtDlpMetadata {
    async fn fetch_title(&self, url: &str) -> Result<String> {
        let info = self.get_video_info(url).await?;
        parse_title(&info)
    }

    fn source_name(&self) -> &'static str {
        "yt-dlp"
    }
}

impl Default for YtDlpMetadata {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}
