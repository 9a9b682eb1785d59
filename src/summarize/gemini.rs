//! Client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::SummarizeError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Failure of a single generation call. Transient failures are worth
/// retrying, permanent ones are not.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct GenerateError {
    message: String,
    transient: bool,
}

impl GenerateError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self { message: message.into(), transient: true }
    }

    pub fn permanent(message: impl Into<String>) -> Self {
        Self { message: message.into(), transient: false }
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

/// Seam between the pipeline and the hosted language model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the generated text verbatim
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Model identifier used for result metadata
    fn model_name(&self) -> String;
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

/// Production implementation talking to the Gemini API
pub struct GeminiClient {
    config: GeminiConfig,
    api_key: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, api_key: String) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SummarizeError::Http(e.to_string()))?;

        Ok(Self { config, api_key, client })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.config.model, self.api_key
        );

        tracing::debug!("Sending request to the Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    GenerateError::transient(format!("request failed: {}", e))
                } else {
                    GenerateError::permanent(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Gemini API error {}: {}", status, body);
            return if is_transient_status(status) {
                Err(GenerateError::transient(message))
            } else {
                Err(GenerateError::permanent(message))
            };
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::permanent(format!("malformed response: {}", e)))?;

        gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GenerateError::permanent("no candidates in response"))
    }

    fn model_name(&self) -> String {
        self.config.model.clone()
    }
}

/// Quota pressure and server-side faults are retryable, everything else is not
fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
