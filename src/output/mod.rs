use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::summarize::SummaryResult;
use crate::utils::generate_summary_filename;

pub mod formatters;

pub use formatters::*;

fn render(result: &SummaryResult, format: &OutputFormat, include_transcript: bool) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format_as_text(result, include_transcript),
        OutputFormat::Json => format_as_json(result, include_transcript)?,
        OutputFormat::Markdown => format_as_markdown(result, include_transcript),
    })
}

fn file_extension(format: &OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

/// Save the summary to a file. A directory path gets a generated filename
/// derived from the video title.
pub async fn save_to_file(
    result: &SummaryResult,
    path: &Path,
    format: &OutputFormat,
    include_transcript: bool,
) -> Result<PathBuf> {
    let target = if path.is_dir() {
        let base = result
            .metadata
            .title
            .as_deref()
            .unwrap_or(&result.metadata.video_id);
        path.join(generate_summary_filename(base, file_extension(format)))
    } else {
        path.to_path_buf()
    };

    let content = render(result, format, include_transcript)?;
    fs_err::write(&target, content)?;

    Ok(target)
}

/// Print the summary to the console
pub fn print_to_console(
    result: &SummaryResult,
    format: &OutputFormat,
    include_transcript: bool,
) -> Result<()> {
    let content = render(result, format, include_transcript)?;
    println!("{}", content);
    Ok(())
}
