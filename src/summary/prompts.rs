//! Prompt templates sent to the text model.

pub const HUMAN_INCLUDED: &str =
    "Include a photorealistic human or human face expressing emotion relevant to the topic.";
pub const HUMAN_EXCLUDED: &str = "Do NOT include any human faces, people, or humanoid figures.";
pub const TEXT_INCLUDED: &str = "Include the video title or catchy keywords in big bold letters.";
pub const TEXT_EXCLUDED: &str =
    "Do NOT include any text, letters, or words in the image. Focus purely on the visual art.";
pub const QUALITY_MODIFIERS: &str = "High quality, 4k, trending on artstation.";

/// Short summary of a whole transcript. The transcript is never truncated.
pub fn build_summary_prompt(transcript: &str) -> String {
    format!(
        "Provide a very short summary, no more than three sentences, for the following video transcript.\n\
Focus on the main topic and key takeaways.\n\
\n\
Transcript:\n\
{transcript}\n\
\n\
Summary:"
    )
}

pub fn build_analysis_prompt(summary: &str) -> String {
    format!(
        "Please extract the following information from this video summary to help design a YouTube thumbnail:\n\
Video Summary: {summary}\n\
\n\
Task:\n\
1. Video Topic: What is the main subject?\n\
2. Target Audience: Who is watching?\n\
3. Visual Vibe: Describe the color scheme and aesthetic."
    )
}

pub fn build_composition_prompt(analysis: &str, include_human: bool, include_text: bool) -> String {
    let human_constraint = if include_human {
        HUMAN_INCLUDED
    } else {
        HUMAN_EXCLUDED
    };
    let text_constraint = if include_text {
        TEXT_INCLUDED
    } else {
        TEXT_EXCLUDED
    };

    format!(
        "Create a detailed image generation prompt for a YouTube thumbnail based on this analysis:\n\
{analysis}\n\
\n\
Constraints:\n\
- {human_constraint}\n\
- {text_constraint}\n\
- {QUALITY_MODIFIERS}\n\
\n\
Output ONLY the prompt string."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_full_transcript() {
        let transcript = "word ".repeat(50_000);
        let prompt = build_summary_prompt(&transcript);
        assert!(prompt.contains(&transcript));
        assert!(prompt.contains("no more than three sentences"));
    }

    #[test]
    fn test_composition_prompt_constraints() {
        let with_both = build_composition_prompt("Topic: Rust", true, true);
        assert!(with_both.contains(HUMAN_INCLUDED));
        assert!(with_both.contains(TEXT_INCLUDED));
        assert!(with_both.contains(QUALITY_MODIFIERS));

        let with_neither = build_composition_prompt("Topic: Rust", false, false);
        assert!(with_neither.contains(HUMAN_EXCLUDED));
        assert!(with_neither.contains(TEXT_EXCLUDED));
        assert!(!with_neither.contains(HUMAN_INCLUDED));
    }
}
