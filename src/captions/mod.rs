use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub mod player;

use crate::video::VideoId;
use crate::SummarizeError;
use player::{PlayerResponse, TranscriptEvent};

/// Browser-like user agent, the watch page serves a reduced payload otherwise
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// One caption track attached to a video
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    /// Language code used when fetching the track
    pub language_code: String,

    /// Human-readable name shown to the user
    pub display_name: String,

    /// Service URL the track is fetched from
    pub base_url: String,

    /// Whether the track was auto-generated by speech recognition
    pub auto_generated: bool,
}

/// Everything the watch page tells us about a video's captions
#[derive(Debug, Clone)]
pub struct CaptionListing {
    pub tracks: Vec<CaptionTrack>,
    pub title: Option<String>,
    pub duration_seconds: Option<u64>,
}

/// One timed caption fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub start_ms: u64,
    pub text: String,
}

/// Source of caption data for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Discover the caption tracks attached to a video
    async fn list_tracks(&self, id: &VideoId) -> Result<CaptionListing, SummarizeError>;

    /// Fetch the timed fragments of one track
    async fn fetch_fragments(&self, track: &CaptionTrack) -> Result<Vec<Fragment>, SummarizeError>;
}

/// Caption client backed by the watch page and its json3 caption streams
pub struct YoutubeCaptionClient {
    client: Client,
}

impl YoutubeCaptionClient {
    pub fn new(timeout: Duration) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SummarizeError::Http(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CaptionSource for YoutubeCaptionClient {
    async fn list_tracks(&self, id: &VideoId) -> Result<CaptionListing, SummarizeError> {
        tracing::debug!("Fetching watch page for video {}", id);

        let response = self
            .client
            .get(id.watch_url())
            .send()
            .await
            .map_err(|e| SummarizeError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SummarizeError::Http(format!(
                "watch page returned HTTP {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SummarizeError::Http(e.to_string()))?;

        let player = player::extract_player_response(&html).map_err(|e| {
            tracing::debug!("Player response extraction failed: {}", e);
            SummarizeError::NoCaptionsAvailable(id.to_string())
        })?;

        listing_from_player_response(id, player)
    }

    async fn fetch_fragments(&self, track: &CaptionTrack) -> Result<Vec<Fragment>, SummarizeError> {
        let url = format!("{}&fmt=json3", track.base_url);
        tracing::debug!("Fetching caption stream for language {}", track.language_code);

        let unavailable = |reason: String| SummarizeError::TranscriptUnavailable {
            language: track.language_code.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body = response.text().await.map_err(|e| unavailable(e.to_string()))?;

        let transcript = player::parse_transcript(&body).map_err(|e| unavailable(e.to_string()))?;

        Ok(events_to_fragments(transcript.events))
    }
}

/// Convert a validated player response into a caption listing
fn listing_from_player_response(
    id: &VideoId,
    player: PlayerResponse,
) -> Result<CaptionListing, SummarizeError> {
    let raw_tracks = player
        .captions
        .map(|c| c.renderer.tracks)
        .unwrap_or_default();

    if raw_tracks.is_empty() {
        return Err(SummarizeError::NoCaptionsAvailable(id.to_string()));
    }

    let tracks = raw_tracks
        .into_iter()
        .map(|raw| {
            let display_name = raw
                .name
                .as_ref()
                .and_then(|name| name.display())
                .unwrap_or_else(|| display_name_for(&raw.language_code));

            CaptionTrack {
                display_name,
                auto_generated: raw.kind.as_deref() == Some("asr"),
                language_code: raw.language_code,
                base_url: raw.base_url,
            }
        })
        .collect();

    let (title, duration_seconds) = match player.video_details {
        Some(details) => (
            details.title,
            details.length_seconds.and_then(|s| s.parse().ok()),
        ),
        None => (None, None),
    };

    Ok(CaptionListing {
        tracks,
        title,
        duration_seconds,
    })
}

/// Flatten json3 events into ordered fragments, dropping non-text events
fn events_to_fragments(events: Vec<TranscriptEvent>) -> Vec<Fragment> {
    events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let raw: String = segs.iter().map(|seg| seg.utf8.as_str()).collect();
            let decoded = html_escape::decode_html_entities(&raw);
            let text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            Some(Fragment {
                start_ms: event.start_ms.unwrap_or(0),
                text,
            })
        })
        .collect()
}

/// Concatenate fragments in source time order with single-space separation
pub fn assemble_transcript(mut fragments: Vec<Fragment>) -> String {
    fragments.sort_by_key(|f| f.start_ms);
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deduplicated language choices with a reverse map back to language codes
#[derive(Debug, Clone)]
pub struct LanguageMenu {
    names: Vec<String>,
    by_name: HashMap<String, String>,
}

impl LanguageMenu {
    /// Build the menu from the listed tracks. Display names are unique; when
    /// several codes share a name the first track wins.
    pub fn from_tracks(tracks: &[CaptionTrack]) -> Self {
        let mut names = Vec::new();
        let mut by_name = HashMap::new();

        for track in tracks {
            if !by_name.contains_key(&track.display_name) {
                names.push(track.display_name.clone());
                by_name.insert(track.display_name.clone(), track.language_code.clone());
            }
        }

        Self { names, by_name }
    }

    /// Display names in listing order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Language code for a display name
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Resolve a user selection, given either as a display name or as a
    /// language code, to the language code of a listed track
    pub fn resolve(&self, selection: &str) -> Option<String> {
        let selection = selection.trim();

        if let Some(code) = self.by_name.get(selection) {
            return Some(code.clone());
        }

        for (name, code) in &self.by_name {
            if name.eq_ignore_ascii_case(selection) || code.eq_ignore_ascii_case(selection) {
                return Some(code.clone());
            }
        }

        None
    }
}

/// Fallback display names for tracks the service lists without one
fn display_name_for(code: &str) -> String {
    let base = code.split('-').next().unwrap_or(code);
    let name = match base.to_lowercase().as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "ta" => "Tamil",
        "ru" => "Russian",
        _ => return code.to_string(),
    };

    if base.len() == code.len() {
        name.to_string()
    } else {
        format!("{} ({})", name, &code[base.len() + 1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::player::TranscriptSeg;

    fn track(code: &str, name: &str) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            display_name: name.to_string(),
            base_url: format!("https://example.test/{}", code),
            auto_generated: false,
        }
    }

    fn event(start_ms: u64, text: &str) -> TranscriptEvent {
        TranscriptEvent {
            start_ms: Some(start_ms),
            duration_ms: None,
            segs: Some(vec![TranscriptSeg {
                utf8: text.to_string(),
            }]),
        }
    }

    #[test]
    fn test_menu_deduplicates_display_names() {
        let tracks = vec![
            track("en", "English"),
            track("en-US", "English"),
            track("ta", "Tamil"),
        ];
        let menu = LanguageMenu::from_tracks(&tracks);

        assert_eq!(menu.names(), &["English", "Tamil"]);
        // First code wins for a shared name
        assert_eq!(menu.code_for("English"), Some("en"));
    }

    #[test]
    fn test_menu_reverse_map_covers_every_name() {
        let tracks = vec![track("en", "English"), track("es", "Spanish")];
        let menu = LanguageMenu::from_tracks(&tracks);

        for name in menu.names() {
            assert!(menu.code_for(name).is_some(), "unresolvable name {}", name);
        }
    }

    #[test]
    fn test_menu_resolves_names_and_codes() {
        let tracks = vec![track("en", "English"), track("es", "Spanish")];
        let menu = LanguageMenu::from_tracks(&tracks);

        assert_eq!(menu.resolve("English").as_deref(), Some("en"));
        assert_eq!(menu.resolve("english").as_deref(), Some("en"));
        assert_eq!(menu.resolve("es").as_deref(), Some("es"));
        assert_eq!(menu.resolve("Klingon"), None);
    }

    #[test]
    fn test_assemble_transcript_preserves_order() {
        let fragments = vec![
            Fragment { start_ms: 0, text: "a".into() },
            Fragment { start_ms: 1, text: "b".into() },
            Fragment { start_ms: 2, text: "c".into() },
        ];
        assert_eq!(assemble_transcript(fragments), "a b c");
    }

    #[test]
    fn test_assemble_transcript_sorts_by_start_time() {
        let fragments = vec![
            Fragment { start_ms: 2000, text: "world".into() },
            Fragment { start_ms: 0, text: "Hello".into() },
        ];
        assert_eq!(assemble_transcript(fragments), "Hello world");
    }

    #[test]
    fn test_events_to_fragments_cleans_text() {
        let events = vec![
            event(0, "it&#39;s   fine\n"),
            event(500, "   "),
            TranscriptEvent { start_ms: Some(800), duration_ms: Some(100), segs: None },
            event(1000, "next"),
        ];

        let fragments = events_to_fragments(events);
        assert_eq!(
            fragments,
            vec![
                Fragment { start_ms: 0, text: "it's fine".into() },
                Fragment { start_ms: 1000, text: "next".into() },
            ]
        );
    }

    #[test]
    fn test_listing_requires_caption_tracks() {
        let id = VideoId::parse("XYZ123").unwrap();
        let player: PlayerResponse = serde_json::from_str(r#"{"videoDetails":{"title":"t"}}"#).unwrap();

        let err = listing_from_player_response(&id, player).unwrap_err();
        assert!(matches!(err, SummarizeError::NoCaptionsAvailable(ref v) if v == "XYZ123"));
    }

    #[test]
    fn test_listing_fills_missing_display_names() {
        let id = VideoId::parse("XYZ123").unwrap();
        let player: PlayerResponse = serde_json::from_str(
            r#"{"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[
                {"baseUrl":"https://example.test/t","languageCode":"ta"},
                {"baseUrl":"https://example.test/t2","languageCode":"en-GB","kind":"asr"}
            ]}}}"#,
        )
        .unwrap();

        let listing = listing_from_player_response(&id, player).unwrap();
        assert_eq!(listing.tracks[0].display_name, "Tamil");
        assert_eq!(listing.tracks[1].display_name, "English (GB)");
        assert!(listing.tracks[1].auto_generated);
    }
}
