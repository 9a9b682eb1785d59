use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::captions::{assemble_transcript, CaptionListing, CaptionSource, LanguageMenu, YoutubeCaptionClient};
use crate::config::{Config, API_KEY_ENV};
use crate::utils;
use crate::video::VideoId;
use crate::SummarizeError;

pub mod gemini;

pub use gemini::{GeminiClient, TextGenerator};

/// Instruction prefix sent ahead of the transcript
const SUMMARY_PROMPT: &str = "You are a video summarizer. You will be taking the transcript text \
and summarizing the entire video, providing the important points under proper sub-headings in a \
concise manner (within 500 words). Please provide the summary of the text given here: ";

/// Summary with metadata about how it was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    /// The generated summary text
    pub summary: String,

    /// The assembled transcript the summary was generated from
    pub transcript: String,

    /// Summarization metadata
    pub metadata: SummaryMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// Canonical video identifier
    pub video_id: String,

    /// Video title when the service reports one
    pub title: Option<String>,

    /// Video length in seconds when the service reports one
    pub video_duration_seconds: Option<u64>,

    /// Still-image URL for the video
    pub thumbnail_url: String,

    /// Language code of the summarized track
    pub language_code: String,

    /// Display name of the summarized track
    pub language_name: String,

    /// Whether the track was auto-generated by speech recognition
    pub auto_generated: bool,

    /// Number of caption fragments the transcript was assembled from
    pub fragment_count: usize,

    /// Length of the assembled transcript in characters
    pub transcript_chars: usize,

    /// Whether the transcript was clipped to the configured budget
    pub clipped: bool,

    /// Model that produced the summary
    pub model: String,

    /// Timestamp when summarization completed
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// A video's identifier together with its discovered caption tracks
#[derive(Debug)]
pub struct VideoCaptions {
    pub id: VideoId,
    pub listing: CaptionListing,
    pub menu: LanguageMenu,
}

/// Main summarization pipeline
pub struct SummaryPipeline {
    config: Config,
    captions: Box<dyn CaptionSource>,
    generator: Option<Box<dyn TextGenerator>>,
}

impl SummaryPipeline {
    /// Create a pipeline with the production caption client and, when an API
    /// key is configured, the production Gemini client
    pub fn new(config: Config) -> Result<Self, SummarizeError> {
        let timeout = Duration::from_secs(config.gemini.timeout_seconds);
        let captions: Box<dyn CaptionSource> = Box::new(YoutubeCaptionClient::new(timeout)?);

        let generator: Option<Box<dyn TextGenerator>> = match &config.api_key {
            Some(key) => Some(Box::new(GeminiClient::new(
                config.gemini.clone(),
                key.clone(),
            )?)),
            None => None,
        };

        Ok(Self { config, captions, generator })
    }

    /// Create a pipeline over caller-provided stage implementations
    pub fn with_sources(
        config: Config,
        captions: Box<dyn CaptionSource>,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            captions,
            generator: Some(generator),
        }
    }

    /// Extract the video identifier and discover its caption tracks
    pub async fn inspect(&self, reference: &str) -> Result<VideoCaptions, SummarizeError> {
        let id = VideoId::parse(reference)?;
        tracing::info!("Extracted video id: {}", id);

        let listing = self.captions.list_tracks(&id).await?;
        let menu = LanguageMenu::from_tracks(&listing.tracks);
        tracing::info!("Found {} caption language(s)", menu.len());

        Ok(VideoCaptions { id, listing, menu })
    }

    /// Fetch the selected caption track and summarize it.
    ///
    /// `selection` is resolved through the language menu, so both display
    /// names and language codes are accepted.
    pub async fn summarize(
        &self,
        video: &VideoCaptions,
        selection: &str,
    ) -> Result<SummaryResult, SummarizeError> {
        let unknown_selection = || SummarizeError::TranscriptUnavailable {
            language: selection.to_string(),
            reason: "no caption track matches the selection".to_string(),
        };

        let code = video.menu.resolve(selection).ok_or_else(unknown_selection)?;
        let track = video
            .listing
            .tracks
            .iter()
            .find(|t| t.language_code == code)
            .ok_or_else(unknown_selection)?;

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress.set_message(format!("Fetching '{}' captions...", track.display_name));

        let fragments = self.captions.fetch_fragments(track).await?;
        let fragment_count = fragments.len();
        let transcript = assemble_transcript(fragments);
        progress.finish_with_message(format!(
            "Fetched {} caption fragments",
            fragment_count
        ));

        if transcript.trim().is_empty() {
            return Err(SummarizeError::EmptyTranscript);
        }

        let generator = self.generator.as_deref().ok_or_else(|| {
            SummarizeError::Config(format!(
                "No API key found. Set the {} environment variable",
                API_KEY_ENV
            ))
        })?;

        let (prompt_text, clipped) =
            utils::clip_to_chars(&transcript, self.config.app.max_transcript_chars);
        if clipped {
            tracing::warn!(
                "Transcript clipped to {} characters before prompting",
                self.config.app.max_transcript_chars
            );
        }
        let prompt = format!("{}{}", SUMMARY_PROMPT, prompt_text);

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress.set_message("Generating summary...");

        let summary = self.generate_with_retries(generator, &prompt).await;
        match &summary {
            Ok(_) => progress.finish_with_message("Summary generated"),
            Err(_) => progress.finish_with_message("Summarization failed"),
        }
        let summary = summary?;

        Ok(SummaryResult {
            metadata: SummaryMetadata {
                video_id: video.id.to_string(),
                title: video.listing.title.clone(),
                video_duration_seconds: video.listing.duration_seconds,
                thumbnail_url: video.id.thumbnail_url(),
                language_code: track.language_code.clone(),
                language_name: track.display_name.clone(),
                auto_generated: track.auto_generated,
                fragment_count,
                transcript_chars: transcript.chars().count(),
                clipped,
                model: generator.model_name(),
                completed_at: chrono::Utc::now(),
            },
            transcript,
            summary,
        })
    }

    /// Bounded retry with doubling backoff, transient failures only
    async fn generate_with_retries(
        &self,
        generator: &dyn TextGenerator,
        prompt: &str,
    ) -> Result<String, SummarizeError> {
        let attempts = self.config.gemini.retry_attempts.max(1);
        let mut delay = Duration::from_millis(self.config.gemini.retry_base_delay_ms);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match generator.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        "Generation attempt {}/{} failed: {} (retrying in {:?})",
                        attempt,
                        attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(err) => return Err(SummarizeError::SummarizationFailed(err.to_string())),
            }
        }
    }
}
