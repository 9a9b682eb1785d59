use anyhow::Result;

use crate::summarize::SummaryResult;
use crate::utils::format_duration;

/// Plain-text rendering, a short header followed by the summary
pub fn format_as_text(result: &SummaryResult, include_transcript: bool) -> String {
    let meta = &result.metadata;
    let mut out = String::new();

    if let Some(title) = &meta.title {
        out.push_str(title);
        out.push('\n');
    }
    out.push_str(&format!(
        "Video: {} | Language: {}{}\n",
        meta.video_id,
        meta.language_name,
        if meta.auto_generated { " (auto-generated)" } else { "" }
    ));
    if let Some(seconds) = meta.video_duration_seconds {
        out.push_str(&format!("Duration: {}\n", format_duration(seconds)));
    }
    out.push_str(&format!("Thumbnail: {}\n", meta.thumbnail_url));
    out.push('\n');
    out.push_str(result.summary.trim());
    out.push('\n');

    if include_transcript {
        out.push_str("\n--- Transcript ---\n");
        out.push_str(&result.transcript);
        out.push('\n');
    }

    out
}

/// JSON rendering of the full result
pub fn format_as_json(result: &SummaryResult, include_transcript: bool) -> Result<String> {
    let mut value = serde_json::to_value(result)?;

    if !include_transcript {
        if let Some(object) = value.as_object_mut() {
            object.remove("transcript");
        }
    }

    Ok(serde_json::to_string_pretty(&value)?)
}

/// Markdown rendering with a metadata header
pub fn format_as_markdown(result: &SummaryResult, include_transcript: bool) -> String {
    let meta = &result.metadata;
    let mut out = String::new();

    out.push_str(&format!(
        "# {}\n\n",
        meta.title.as_deref().unwrap_or("Video summary")
    ));
    out.push_str(&format!("![thumbnail]({})\n\n", meta.thumbnail_url));
    out.push_str(&format!("- **Video:** `{}`\n", meta.video_id));
    out.push_str(&format!(
        "- **Language:** {}{}\n",
        meta.language_name,
        if meta.auto_generated { " (auto-generated)" } else { "" }
    ));
    if let Some(seconds) = meta.video_duration_seconds {
        out.push_str(&format!("- **Duration:** {}\n", format_duration(seconds)));
    }
    out.push_str(&format!("- **Model:** {}\n", meta.model));
    out.push_str(&format!(
        "- **Generated:** {}\n",
        meta.completed_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push('\n');
    out.push_str("## Summary\n\n");
    out.push_str(result.summary.trim());
    out.push('\n');

    if include_transcript {
        out.push_str("\n## Transcript\n\n");
        out.push_str(&result.transcript);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::SummaryMetadata;

    fn sample_result() -> SummaryResult {
        SummaryResult {
            summary: "A short summary.".to_string(),
            transcript: "Hello world".to_string(),
            metadata: SummaryMetadata {
                video_id: "XYZ123".to_string(),
                title: Some("A video".to_string()),
                video_duration_seconds: Some(90),
                thumbnail_url: "https://img.youtube.com/vi/XYZ123/0.jpg".to_string(),
                language_code: "en".to_string(),
                language_name: "English".to_string(),
                auto_generated: false,
                fragment_count: 2,
                transcript_chars: 11,
                clipped: false,
                model: "test-model".to_string(),
                completed_at: chrono::Utc::now(),
            },
        }
    }

    #[test]
    fn test_text_format() {
        let text = format_as_text(&sample_result(), false);
        assert!(text.starts_with("A video\n"));
        assert!(text.contains("Language: English"));
        assert!(text.contains("Duration: 1m 30s"));
        assert!(text.contains("A short summary."));
        assert!(!text.contains("Transcript"));

        let with_transcript = format_as_text(&sample_result(), true);
        assert!(with_transcript.contains("--- Transcript ---\nHello world"));
    }

    #[test]
    fn test_json_format_transcript_is_opt_in() {
        let json = format_as_json(&sample_result(), false).unwrap();
        assert!(!json.contains("\"transcript\""));

        let json = format_as_json(&sample_result(), true).unwrap();
        assert!(json.contains("\"transcript\": \"Hello world\""));
        assert!(json.contains("\"video_id\": \"XYZ123\""));
    }

    #[test]
    fn test_markdown_format() {
        let md = format_as_markdown(&sample_result(), false);
        assert!(md.starts_with("# A video\n"));
        assert!(md.contains("## Summary"));
        assert!(md.contains("- **Model:** test-model"));
        assert!(!md.contains("## Transcript"));
    }
}
