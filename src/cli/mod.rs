use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vidsum",
    about = "Video Summarizer - Fetch a video's captions and summarize them with Gemini",
    version,
    long_about = "A CLI tool that discovers the caption tracks of a video, downloads the \
                  selected track as plain text and asks the Gemini generative-language API \
                  for a concise summary of the whole video."
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
    /// Summarize a video from its caption track
    Summarize {
        /// Video link or bare video id (youtube.com/watch, youtu.be, embed, shorts)
        #[arg(value_name = "URL_OR_ID")]
        url: String,

        /// Caption language to use, as a display name ("English") or code ("en").
        /// With a single available track this can be omitted.
        #[arg(short, long, value_name = "NAME_OR_CODE")]
        language: Option<String>,

        /// Output file or directory (prints to console if not specified)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Include the fetched transcript in the output
        #[arg(long)]
        show_transcript: bool,
    },

    /// List the caption languages available for a video
    Languages {
        /// Video link or bare video id
        #[arg(value_name = "URL_OR_ID")]
        url: String,
    },

    /// Show configuration and the config file location
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON with metadata
    Json,
    /// Markdown with a metadata header
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
