use anyhow::{anyhow, Context};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{GeneratedImage, ImageGenerator, TextGenerator};
use crate::config::GeminiConfig;
use crate::Result;

/// Minimal client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_parts(self) -> Result<Vec<Part>> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            anyhow::bail!("Gemini blocked the prompt: {}", reason);
        }

        self.candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No response from Gemini"))
            .map(|candidate| candidate.content.map(|c| c.parts).unwrap_or_default())
    }
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Text client for the configured text model
    pub fn text(config: &GeminiConfig) -> Self {
        Self::new(&config.api_base, &config.api_key, &config.text_model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(
        &self,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateResponse> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config,
        };

        tracing::debug!("Sending request to Gemini model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, text);
        }

        response
            .json::<GenerateResponse>()
            .await
            .context("Failed to parse Gemini response")
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let parts = self.generate_content(prompt, None).await?.into_parts()?;

        Ok(parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

/// Image generation through a Gemini image model, saved to disk
pub struct GeminiImageGenerator {
    client: GeminiClient,
    output_dir: PathBuf,
}

impl GeminiImageGenerator {
    pub fn new(config: &GeminiConfig, output_dir: PathBuf) -> Self {
        Self {
            client: GeminiClient::new(&config.api_base, &config.api_key, &config.image_model),
            output_dir,
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let generation_config = GenerationConfig {
            response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
        };
        let parts = self
            .client
            .generate_content(prompt, Some(generation_config))
            .await?
            .into_parts()?;

        let image = parts
            .into_iter()
            .find_map(|part| part.inline_data)
            .ok_or_else(|| anyhow!("Gemini returned no image for the prompt"))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(image.data.as_bytes())
            .context("Gemini returned invalid image data")?;

        fs_err::create_dir_all(&self.output_dir)?;
        let filename = crate::utils::generate_unique_filename(
            "thumbnail",
            crate::utils::extension_for_mime(&image.mime_type),
        );
        let path = self.output_dir.join(filename);
        fs_err::write(&path, bytes).context("Failed to write generated image")?;

        tracing::info!(
            "Saved generated image from {} to {}",
            self.client.model(),
            path.display()
        );

        Ok(GeneratedImage {
            location: path.display().to_string(),
            mime_type: image.mime_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("hi".to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert!(value["contents"][0]["parts"][0].get("inlineData").is_none());
        assert_eq!(value["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_response_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                    ]
                }
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        let parts = response.into_parts().unwrap();

        assert_eq!(parts[0].text.as_deref(), Some("Here you go"));
        let data = parts[1].inline_data.as_ref().unwrap();
        assert_eq!(data.mime_type, "image/png");
    }

    #[test]
    fn test_blocked_or_empty_response_is_error() {
        let blocked: GenerateResponse =
            serde_json::from_str(r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#).unwrap();
        assert!(blocked.into_parts().unwrap_err().to_string().contains("SAFETY"));

        let empty: GenerateResponse = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
        assert!(empty.into_parts().is_err());
    }

    #[test]
    fn test_candidate_without_content_is_empty_text() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [{ "finishReason": "STOP" }] }"#).unwrap();
        assert!(response.into_parts().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_error() {
        let client = GeminiClient::new("http://127.0.0.1:9/v1beta", "key", "gemini-2.5-flash");
        assert!(client.generate("hello").await.is_err());
    }
}
