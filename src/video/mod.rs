use std::fmt;
use url::Url;

use crate::SummarizeError;

/// Canonical video identifier extracted from a reference string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Parse a video reference into its identifier.
    ///
    /// Accepts the common link shapes (`watch?v=`, `youtu.be/<id>`,
    /// `/embed/<id>`, `/shorts/<id>`) as well as a bare identifier token.
    pub fn parse(reference: &str) -> Result<Self, SummarizeError> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(SummarizeError::InvalidReferenceFormat(
                "empty reference".to_string(),
            ));
        }

        // A pasted bare id is unambiguous on the command line
        if !reference.contains("://") && is_valid_token(reference) {
            return Ok(Self(reference.to_string()));
        }

        let parsed = Url::parse(reference).map_err(|_| {
            SummarizeError::InvalidReferenceFormat(format!("not a valid URL: {}", reference))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SummarizeError::InvalidReferenceFormat(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        // watch?v=<id>, on any host shape
        for (key, value) in parsed.query_pairs() {
            if key == "v" {
                let id = value.trim();
                if is_valid_token(id) {
                    return Ok(Self(id.to_string()));
                }
                return Err(SummarizeError::InvalidReferenceFormat(format!(
                    "malformed video id in 'v' parameter: {:?}",
                    id
                )));
            }
        }

        // youtu.be/<id>
        if parsed
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case("youtu.be"))
        {
            if let Some(seg) = parsed.path_segments().and_then(|mut s| s.next()) {
                let seg = seg.trim();
                if is_valid_token(seg) {
                    return Ok(Self(seg.to_string()));
                }
            }
        }

        // /embed/<id>, /shorts/<id>
        if let Some(mut segs) = parsed.path_segments() {
            let first = segs.next().unwrap_or("");
            let second = segs.next().unwrap_or("").trim();
            if matches!(first, "embed" | "shorts") && is_valid_token(second) {
                return Ok(Self(second.to_string()));
            }
        }

        Err(SummarizeError::InvalidReferenceFormat(format!(
            "no video id found in reference: {}",
            reference
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch-page URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Still-image URL shown alongside the summary
    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/0.jpg", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier alphabet used by the service
fn is_valid_token(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
