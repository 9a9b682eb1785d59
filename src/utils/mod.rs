/// Sanitize filename for safe filesystem usage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            match c {
                // Keep alphanumeric characters, spaces, hyphens, underscores, and dots
                c if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' => c,
                // Replace everything else with underscore
                _ => '_',
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Generate a summary filename with timestamp
pub fn generate_summary_filename(base_name: &str, extension: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let base = sanitize_filename(base_name);
    let base = if base.is_empty() { "video".to_string() } else { base };

    format!("summary_{}_{}.{}", base, timestamp, extension)
}

/// Format duration in human-readable format
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Clip text to a character budget, returning whether clipping happened
pub fn clip_to_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World!"), "Hello World_");
        assert_eq!(sanitize_filename("test/file?name"), "test_file_name");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
    }

    #[test]
    fn test_generate_summary_filename() {
        let name = generate_summary_filename("My Video: Part 1", "md");
        assert!(name.starts_with("summary_My Video_ Part 1_"));
        assert!(name.ends_with(".md"));

        let fallback = generate_summary_filename("???", "txt");
        assert!(fallback.starts_with("summary_"));
        assert!(fallback.ends_with(".txt"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30s");
        assert_eq!(format_duration(90), "1m 30s");
        assert_eq!(format_duration(3661), "1h 1m 1s");
    }

    #[test]
    fn test_clip_to_chars() {
        assert_eq!(clip_to_chars("Hello world", 5), ("Hello", true));
        assert_eq!(clip_to_chars("Hello", 5), ("Hello", false));
        assert_eq!(clip_to_chars("Hello", 10), ("Hello", false));
        // Clipping respects character boundaries in multi-byte text
        assert_eq!(clip_to_chars("héllo", 2), ("hé", true));
    }
}
