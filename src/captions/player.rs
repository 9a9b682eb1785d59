//! Boundary schemas for the watch-page player response and the json3
//! caption stream. Shapes are declared explicitly and validated on receipt
//! instead of being walked as untyped JSON.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

/// The player response blob embedded in the watch page
#[derive(Debug, Deserialize)]
pub struct PlayerResponse {
    pub captions: Option<Captions>,
    #[serde(rename = "videoDetails")]
    pub video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
pub struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    pub renderer: CaptionsRenderer,
}

#[derive(Debug, Deserialize)]
pub struct CaptionsRenderer {
    #[serde(rename = "captionTracks", default)]
    pub tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
pub struct RawCaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    pub name: Option<TrackName>,

    #[serde(rename = "languageCode")]
    pub language_code: String,

    /// "asr" marks auto-generated tracks
    pub kind: Option<String>,
}

/// Track names arrive either as `{"simpleText": ...}` or `{"runs": [{"text": ...}]}`
#[derive(Debug, Deserialize)]
pub struct TrackName {
    #[serde(rename = "simpleText")]
    pub simple_text: Option<String>,

    #[serde(default)]
    pub runs: Vec<TrackNameRun>,
}

#[derive(Debug, Deserialize)]
pub struct TrackNameRun {
    pub text: String,
}

impl TrackName {
    pub fn display(&self) -> Option<String> {
        if let Some(text) = &self.simple_text {
            return Some(text.clone());
        }
        if self.runs.is_empty() {
            return None;
        }
        Some(
            self.runs
                .iter()
                .map(|run| run.text.as_str())
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct VideoDetails {
    pub title: Option<String>,

    #[serde(rename = "lengthSeconds")]
    pub length_seconds: Option<String>,
}

/// json3 caption stream
#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub events: Vec<TranscriptEvent>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptEvent {
    #[serde(rename = "tStartMs")]
    pub start_ms: Option<u64>,

    #[serde(rename = "dDurationMs")]
    pub duration_ms: Option<u64>,

    pub segs: Option<Vec<TranscriptSeg>>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptSeg {
    pub utf8: String,
}

/// Extract the `ytInitialPlayerResponse` JSON from the watch-page HTML
pub fn extract_player_response(html: &str) -> Result<PlayerResponse> {
    let re = Regex::new(r"var ytInitialPlayerResponse\s*=\s*(\{.*?\});")
        .expect("player response pattern is valid");

    let captures = re
        .captures(html)
        .context("Could not find the player response in the watch page")?;
    let json_str = captures
        .get(1)
        .context("Could not capture the player response JSON")?
        .as_str();

    let response: PlayerResponse =
        serde_json::from_str(json_str).context("Failed to deserialize the player response")?;

    Ok(response)
}

/// Parse a json3 caption body
pub fn parse_transcript(body: &str) -> Result<TranscriptResponse> {
    serde_json::from_str(body).context("Failed to deserialize the caption stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_player_response() {
        let html = concat!(
            "<html><script>var ytInitialPlayerResponse = ",
            r#"{"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":"#,
            r#"[{"baseUrl":"https://example.test/t","name":{"simpleText":"English"},"languageCode":"en"}]}},"#,
            r#""videoDetails":{"title":"A video","lengthSeconds":"63"}};</script></html>"#,
        );

        let response = extract_player_response(html).unwrap();
        let captions = response.captions.unwrap();
        assert_eq!(captions.renderer.tracks.len(), 1);
        assert_eq!(captions.renderer.tracks[0].language_code, "en");
        assert_eq!(
            captions.renderer.tracks[0].name.as_ref().unwrap().display(),
            Some("English".to_string())
        );
        assert_eq!(response.video_details.unwrap().title.as_deref(), Some("A video"));
    }

    #[test]
    fn test_extract_player_response_missing() {
        let err = extract_player_response("<html>nothing here</html>").unwrap_err();
        assert!(err.to_string().contains("player response"));
    }

    #[test]
    fn test_track_name_from_runs() {
        let name: TrackName =
            serde_json::from_str(r#"{"runs":[{"text":"English "},{"text":"(auto-generated)"}]}"#)
                .unwrap();
        assert_eq!(name.display(), Some("English (auto-generated)".to_string()));
    }

    #[test]
    fn test_parse_transcript_events() {
        let body = r#"{"events":[
            {"tStartMs":0,"dDurationMs":1000,"segs":[{"utf8":"Hello"}]},
            {"tStartMs":1000,"segs":[{"utf8":" world"}]},
            {"tStartMs":2000}
        ]}"#;

        let transcript = parse_transcript(body).unwrap();
        assert_eq!(transcript.events.len(), 3);
        assert_eq!(transcript.events[0].segs.as_ref().unwrap()[0].utf8, "Hello");
        assert!(transcript.events[2].segs.is_none());
    }
}
