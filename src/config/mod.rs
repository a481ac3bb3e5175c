use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini configuration
    pub gemini: GeminiConfig,

    /// YouTube access settings
    pub youtube: YoutubeConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API
    pub api_base: String,

    /// Model used for summaries and prompt writing
    pub text_model: String,

    /// Model used for thumbnail images
    pub image_model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Resolved from `api_key_env` at load time, never written to disk
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Path or name of the yt-dlp binary
    pub yt_dlp_path: String,

    /// Host serving `/vi/{id}/{resolution}.jpg`
    pub thumbnail_host: String,

    /// Caption languages tried by the manual and generated tiers
    pub transcript_languages: Vec<String>,

    /// Language other transcripts are translated into
    pub translation_target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where generated thumbnails are written (current directory if unset)
    pub image_output_dir: Option<PathBuf>,

    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                text_model: "gemini-2.5-flash".to_string(),
                image_model: "gemini-2.5-flash-image".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
                api_key: String::new(),
            },
            youtube: YoutubeConfig {
                yt_dlp_path: "yt-dlp".to_string(),
                thumbnail_host: "https://img.youtube.com".to_string(),
                transcript_languages: vec!["en".to_string()],
                translation_target: "en".to_string(),
            },
            app: AppConfig {
                image_output_dir: None,
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default, then resolve the API key.
    ///
    /// A missing key is fatal: nothing downstream can run without it.
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            let config = Self::default();
            config.save().await?;
            config
        };

        config.resolve_api_key(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Read and validate a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("yt-digest").join("config.yaml"))
    }

    /// Fill `gemini.api_key` from the configured environment variable
    pub fn resolve_api_key<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_var = &self.gemini.api_key_env;
        match lookup(env_var).filter(|key| !key.trim().is_empty()) {
            Some(key) => {
                self.gemini.api_key = key;
                Ok(())
            }
            None => anyhow::bail!(
                "{} environment variable not set. Please export your Gemini API key.",
                env_var
            ),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.gemini.text_model.trim().is_empty() || self.gemini.image_model.trim().is_empty() {
            anyhow::bail!("Gemini text and image models must be configured");
        }

        if self.gemini.api_key_env.trim().is_empty() {
            anyhow::bail!("gemini.api_key_env must name an environment variable");
        }

        if self.youtube.transcript_languages.is_empty() {
            anyhow::bail!("At least one transcript language must be configured");
        }

        if self.youtube.translation_target.trim().is_empty() {
            anyhow::bail!("youtube.translation_target must name a language code");
        }

        for (name, value) in [
            ("gemini.api_base", &self.gemini.api_base),
            ("youtube.thumbnail_host", &self.youtube.thumbnail_host),
        ] {
            let parsed = Url::parse(value).with_context(|| format!("Invalid URL for {}", name))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{} must use HTTP or HTTPS protocol", name);
            }
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Gemini API: {}", self.gemini.api_base);
        println!("  Text Model: {}", self.gemini.text_model);
        println!("  Image Model: {}", self.gemini.image_model);
        println!("  API Key: from ${}", self.gemini.api_key_env);
        println!("  yt-dlp: {}", self.youtube.yt_dlp_path);
        println!(
            "  Transcript Languages: {}",
            self.youtube.transcript_languages.join(", ")
        );
        if let Some(dir) = &self.app.image_output_dir {
            println!("  Image Output: {}", dir.display());
        }
        println!("  Default Format: {}", self.app.default_output_format);
    }

    /// Tell the user where the config file lives
    pub fn print_setup_help(&self) -> Result<()> {
        println!("Edit the config file to change settings:");
        println!("  {}", Self::config_path()?.display());
        println!(
            "The Gemini API key is read from the {} environment variable.",
            self.gemini.api_key_env
        );
        Ok(())
    }

    /// Directory for generated images
    pub fn image_output_dir(&self) -> Result<PathBuf> {
        match &self.app.image_output_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Could not determine current directory"),
        }
    }
}
