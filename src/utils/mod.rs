/// `ytdigest_<stem>_<timestamp>_<random>.<extension>`; characters of `stem`
/// outside `[A-Za-z0-9_-]` become `_`
pub fn generate_unique_filename(stem: &str, extension: &str) -> String {
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let random_suffix = &uuid::Uuid::new_v4().simple().to_string()[..8];

    format!("ytdigest_{}_{}_{}.{}", stem, timestamp, random_suffix, extension)
}

/// File extension for an image MIME type
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// Check if the current environment has required tools
pub async fn check_dependencies(yt_dlp_path: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !crate::extractors::YtDlpMetadata::new(yt_dlp_path)
        .check_availability()
        .await
    {
        missing.push(format!(
            "{} - required for video metadata (https://github.com/yt-dlp/yt-dlp)",
            yt_dlp_path
        ));
    }

    missing
}
