use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Gemini API credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API configuration
    pub gemini: GeminiConfig,

    /// Application settings
    pub app: AppConfig,

    /// API credential, read from the environment at startup and never persisted
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model used for summarization
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Retry attempts for transient failures (1 = no retry)
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds, doubled per attempt
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Preferred caption language code when several tracks exist
    pub default_language: Option<String>,

    /// Default output format
    pub default_output_format: String,

    /// Transcripts longer than this are clipped before prompting
    pub max_transcript_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                model: "gemini-1.5-flash".to_string(),
                timeout_seconds: 60,
                max_output_tokens: 1024,
                temperature: 0.3,
                retry_attempts: 3,
                retry_base_delay_ms: 500,
            },
            app: AppConfig {
                default_language: None,
                default_output_format: "text".to_string(),
                max_transcript_chars: 200_000,
            },
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from file or create default, then overlay the
    /// API credential from the environment
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            config
        } else {
            let config = Self::default();
            config.save().await?;
            config
        };

        config.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

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

        Ok(config_dir.join("video-summarizer").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.gemini.model.is_empty() {
            anyhow::bail!("Gemini model must be configured");
        }

        if self.gemini.retry_attempts == 0 {
            anyhow::bail!("retry_attempts must be at least 1");
        }

        if self.app.max_transcript_chars == 0 {
            anyhow::bail!("max_transcript_chars must be positive");
        }

        Ok(())
    }

    /// The credential is only required once a summarization is requested
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().with_context(|| {
            format!("No API key found. Set the {} environment variable", API_KEY_ENV)
        })
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Model: {}", self.gemini.model);
        println!("  Request Timeout: {}s", self.gemini.timeout_seconds);
        println!("  Max Output Tokens: {}", self.gemini.max_output_tokens);
        println!("  Retry Attempts: {}", self.gemini.retry_attempts);
        if let Some(lang) = &self.app.default_language {
            println!("  Default Language: {}", lang);
        }
        println!("  Default Format: {}", self.app.default_output_format);
        println!("  Transcript Budget: {} chars", self.app.max_transcript_chars);
        println!(
            "  API Key: {}",
            if self.api_key.is_some() { "set" } else { "not set" }
        );
    }
}
