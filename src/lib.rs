//! Video Summarizer - A Rust CLI tool for summarizing videos from their captions
//!
//! This library fetches the caption track of a video, assembles it into plain
//! text and asks the Gemini generative-language API for a concise summary.

pub mod captions;
pub mod cli;
pub mod config;
pub mod output;
pub mod summarize;
pub mod utils;
pub mod video;

pub use captions::{CaptionSource, CaptionTrack, LanguageMenu};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use summarize::{SummaryPipeline, SummaryResult};
pub use video::VideoId;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error kinds produced by the summarization stages
#[derive(thiserror::Error, Debug)]
pub enum SummarizeError {
    #[error("Invalid video reference: {0}")]
    InvalidReferenceFormat(String),

    #[error("No caption tracks available for video '{0}'")]
    NoCaptionsAvailable(String),

    #[error("Caption track '{language}' could not be retrieved: {reason}")]
    TranscriptUnavailable { language: String, reason: String },

    #[error("Transcript is empty, nothing to summarize")]
    EmptyTranscript,

    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Http(String),
}
