use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytdigest",
    about = "yt-digest - Summarize YouTube videos and generate fresh thumbnails with Gemini",
    version,
    long_about = "A CLI tool that fetches a YouTube video's title, thumbnail and transcript, summarizes the transcript with Gemini and can generate a new thumbnail image from the summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a YouTube video from its transcript
    Summarize {
        /// YouTube URL (watch, youtu.be or embed form)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Also generate a new thumbnail from the summary
        #[arg(long)]
        thumbnail: bool,

        #[command(flatten)]
        style: ThumbnailStyle,
    },

    /// Generate a thumbnail image from a summary you provide
    Thumbnail {
        /// Summary text describing the video
        #[arg(value_name = "SUMMARY")]
        summary: String,

        #[command(flatten)]
        style: ThumbnailStyle,
    },

    /// Show configuration and where to edit it
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// What the generated thumbnail may contain
#[derive(clap::Args, Clone, Copy, Debug, Default)]
pub struct ThumbnailStyle {
    /// Allow a human figure or face in the thumbnail
    #[arg(long)]
    pub include_human: bool,

    /// Allow text (title or keywords) in the thumbnail
    #[arg(long)]
    pub include_text: bool,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summarize() {
        let cli = Cli::parse_from([
            "ytdigest",
            "summarize",
            "https://youtu.be/abc",
            "--format",
            "json",
            "--thumbnail",
            "--include-text",
        ]);

        match cli.command {
            Commands::Summarize {
                url,
                format,
                thumbnail,
                style,
                output,
            } => {
                assert_eq!(url, "https://youtu.be/abc");
                assert_eq!(format, Some(OutputFormat::Json));
                assert!(thumbnail);
                assert!(style.include_text);
                assert!(!style.include_human);
                assert!(output.is_none());
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn test_parse_thumbnail_with_global_flags() {
        let cli = Cli::parse_from(["ytdigest", "thumbnail", "A talk about Rust", "--include-human", "-q"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Thumbnail { summary, style } => {
                assert_eq!(summary, "A talk about Rust");
                assert!(style.include_human);
            }
            _ => panic!("expected thumbnail"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
