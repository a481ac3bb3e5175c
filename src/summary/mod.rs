use std::sync::Arc;

use crate::llm::{normalize_whitespace, TextGenerator};

pub mod prompts;

pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable due to error.";
pub const SUMMARY_EMPTY: &str = "No summary generated.";
pub const ANALYSIS_FALLBACK: &str = "General topic analysis.";
pub const PROMPT_EMPTY: &str = "A high quality youtube thumbnail.";
pub const PROMPT_UNAVAILABLE: &str = "A high quality abstract youtube thumbnail.";

/// Summarizes transcripts. Never fails: errors become a sentinel string.
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn summarize(&self, transcript: &str) -> String {
        let prompt = prompts::build_summary_prompt(transcript);

        match self.generator.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => SUMMARY_EMPTY.to_string(),
            Ok(text) => normalize_whitespace(&text),
            Err(e) => {
                tracing::warn!("Error in summarize: {:#}", e);
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}

/// Turns a summary into an image-generation prompt in two model calls
pub struct PromptComposer {
    generator: Arc<dyn TextGenerator>,
}

impl PromptComposer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Topic, audience and visual vibe of the video
    pub async fn analyze(&self, summary: &str) -> String {
        match self
            .generator
            .generate(&prompts::build_analysis_prompt(summary))
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => ANALYSIS_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!("Error analyzing summary: {:#}", e);
                ANALYSIS_FALLBACK.to_string()
            }
        }
    }

    /// Final prompt for the image generator, whitespace normalized
    pub async fn compose(&self, summary: &str, include_human: bool, include_text: bool) -> String {
        let analysis = self.analyze(summary).await;
        let request = prompts::build_composition_prompt(&analysis, include_human, include_text);

        let prompt = match self.generator.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => PROMPT_EMPTY.to_string(),
            Err(e) => {
                tracing::warn!("Error generating prompt: {:#}", e);
                PROMPT_UNAVAILABLE.to_string()
            }
        };

        normalize_whitespace(&prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockTextGenerator;
    use mockall::Sequence;

    #[tokio::test]
    async fn test_summarize_normalizes_whitespace() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt: &str| prompt.contains("hello world"))
            .returning(|_| Ok("  A short\n\nsummary.\t Done. ".to_string()));

        let summarizer = Summarizer::new(Arc::new(generator));
        assert_eq!(summarizer.summarize("hello world").await, "A short summary. Done.");
    }

    #[tokio::test]
    async fn test_summarize_error_returns_sentinel() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(anyhow::anyhow!("quota exceeded")));

        let summarizer = Summarizer::new(Arc::new(generator));
        assert_eq!(
            summarizer.summarize("hello world").await,
            "Summary unavailable due to error."
        );
    }

    #[tokio::test]
    async fn test_summarize_empty_answer() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| Ok("\n".to_string()));

        let summarizer = Summarizer::new(Arc::new(generator));
        assert_eq!(summarizer.summarize("hello").await, SUMMARY_EMPTY);
    }

    #[tokio::test]
    async fn test_compose_feeds_analysis_into_second_call() {
        let mut generator = MockTextGenerator::new();
        let mut seq = Sequence::new();
        generator
            .expect_generate()
            .withf(|prompt: &str| prompt.contains("Video Summary: Rust is fast"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Topic: Rust. Audience: developers.".to_string()));
        generator
            .expect_generate()
            .withf(|prompt: &str| {
                prompt.contains("Topic: Rust. Audience: developers.")
                    && prompt.contains(prompts::HUMAN_EXCLUDED)
                    && prompt.contains(prompts::TEXT_INCLUDED)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("A glowing crab\n  on a  circuit board".to_string()));

        let composer = PromptComposer::new(Arc::new(generator));
        assert_eq!(
            composer.compose("Rust is fast", false, true).await,
            "A glowing crab on a circuit board"
        );
    }

    #[tokio::test]
    async fn test_compose_analysis_failure_uses_fallback() {
        let mut generator = MockTextGenerator::new();
        let mut seq = Sequence::new();
        generator
            .expect_generate()
            .withf(|prompt: &str| prompt.contains("Video Summary: summary"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("timeout")));
        generator
            .expect_generate()
            .withf(|prompt: &str| prompt.contains(ANALYSIS_FALLBACK))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("Abstract art".to_string()));

        let composer = PromptComposer::new(Arc::new(generator));
        assert_eq!(composer.compose("summary", true, false).await, "Abstract art");
    }

    #[tokio::test]
    async fn test_compose_failure_returns_sentinel() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(anyhow::anyhow!("service down")));

        let composer = PromptComposer::new(Arc::new(generator));
        assert_eq!(composer.compose("summary", true, true).await, PROMPT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_compose_empty_answer() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| Ok(String::new()));

        let composer = PromptComposer::new(Arc::new(generator));
        assert_eq!(composer.compose("summary", false, false).await, PROMPT_EMPTY);
    }
}
