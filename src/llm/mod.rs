use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod gemini;

pub use gemini::{GeminiClient, GeminiImageGenerator};

use crate::Result;

/// An image produced by an [`ImageGenerator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// File path or URL of the image
    pub location: String,

    pub mime_type: String,
}

/// Prompt in, text out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Prompt in, image reference out
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage>;
}

/// Collapse every run of whitespace into a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
