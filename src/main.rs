use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_digest::cli::{Cli, Commands, OutputFormat};
use yt_digest::config::Config;
use yt_digest::pipeline::VideoPipeline;
use yt_digest::{output, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "yt_digest=debug"
    } else {
        "yt_digest=info"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Summarize {
            url,
            output,
            format,
            thumbnail,
            style,
        } => {
            // Check for required external dependencies (non-fatal in Docker)
            let missing_deps = utils::check_dependencies(&config.youtube.yt_dlp_path).await;
            if !missing_deps.is_empty() {
                eprintln!("⚠️  Dependency check warnings:");
                for dep in missing_deps {
                    eprintln!("   • {}", dep);
                }
                eprintln!("   (Continuing anyway - tools may be available)");
            }

            let format = format.unwrap_or_else(|| configured_format(&config));
            let pipeline = VideoPipeline::new(&config)?;

            tracing::info!("Processing {}", url);

            let progress = spinner(cli.quiet, "Fetching video data and summary...")?;
            let result = pipeline.process_video_from_url(&url).await;
            progress.finish_and_clear();

            let Some(result) = result else {
                anyhow::bail!("Failed to process video.");
            };

            match output {
                Some(path) => {
                    output::save_to_file(&result, &path, &format).await?;
                    println!("Summary saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&result, &format)?;
                }
            }

            if thumbnail {
                let progress = spinner(cli.quiet, "Generating AI thumbnail...")?;
                let image = pipeline
                    .generate_thumbnail_flow(&result.summary, style.include_human, style.include_text)
                    .await;
                progress.finish_and_clear();

                let image = image.context("Image generation failed")?;
                println!("Generated thumbnail: {}", image.location);
            }
        }
        Commands::Thumbnail { summary, style } => {
            let pipeline = VideoPipeline::new(&config)?;

            let progress = spinner(cli.quiet, "Generating AI thumbnail...")?;
            let image = pipeline
                .generate_thumbnail_flow(&summary, style.include_human, style.include_text)
                .await;
            progress.finish_and_clear();

            let image = image.context("Image generation failed")?;
            println!("Generated thumbnail: {}", image.location);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.print_setup_help()?;
            }
        }
    }

    Ok(())
}

fn configured_format(config: &Config) -> OutputFormat {
    OutputFormat::from_str(&config.app.default_output_format, true).unwrap_or_else(|_| {
        tracing::warn!(
            "Unknown default_output_format '{}', using text",
            config.app.default_output_format
        );
        OutputFormat::Text
    })
}

fn spinner(quiet: bool, message: &'static str) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(120));
    Ok(progress)
}
