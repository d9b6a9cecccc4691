//! Optional text enrichment.
//!
//! Polishes work descriptions and writes short "insight" blurbs through a
//! generative text API. Every call is best-effort: a missing key, a network
//! error or an empty answer falls back to the caller's input (or to an empty
//! insight) and is only logged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default generative model for the HTTP enricher.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Text enrichment capability.
#[async_trait]
pub trait TextEnricher: Send + Sync {
    /// Rewrite a description for a portfolio. Returns `description` unchanged on failure.
    async fn polish(&self, title: &str, description: &str, prompt: Option<&str>) -> String;

    /// A short commentary on a work. Returns an empty string on failure.
    async fn feedback(&self, description: &str) -> String;
}

/// Enricher used when no API key is configured.
pub struct NoopEnricher;

#[async_trait]
impl TextEnricher for NoopEnricher {
    async fn polish(&self, _title: &str, description: &str, _prompt: Option<&str>) -> String {
        description.to_string()
    }

    async fn feedback(&self, _description: &str) -> String {
        String::new()
    }
}

/// Errors inside the HTTP enricher. Never leave this module.
#[derive(Debug, thiserror::Error)]
enum EnrichError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Enrichment API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Enrichment API returned no text")]
    Empty,
}

/// Enricher backed by the Gemini `generateContent` endpoint.
pub struct GeminiEnricher {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl GeminiEnricher {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base(DEFAULT_API_BASE.to_string(), api_key, model)
    }

    /// Point the client at another API host (proxies, tests).
    pub fn with_base(api_base: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
            model,
        }
    }

    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, EnrichError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_base, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or(EnrichError::Empty)
    }
}

#[async_trait]
impl TextEnricher for GeminiEnricher {
    async fn polish(&self, title: &str, description: &str, prompt: Option<&str>) -> String {
        let request = format!(
            "You are a professional content curator. Rewrite the description of this \
             generative artwork for a job-seeking portfolio.\n\n\
             Title: {title}\n\
             Draft description: {description}\n\
             Prompt used: {}\n\n\
             Keep it professional and concise, highlight the creative vision and the \
             technical execution. Reply with the rewritten description only.",
            prompt.unwrap_or("(none)")
        );

        match self.generate(&request, 0.7).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Description polish failed, keeping original: {}", e);
                description.to_string()
            }
        }
    }

    async fn feedback(&self, description: &str) -> String {
        let request = format!(
            "Give a short technical insight or a note on the main creative difficulty \
             of this work, under 100 words, in a professional and forward-looking tone: \
             {description}"
        );

        match self.generate(&request, 0.8).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Insight generation failed: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_falls_back() {
        let enricher = NoopEnricher;
        assert_eq!(enricher.polish("t", "rough", Some("p")).await, "rough");
        assert_eq!(enricher.feedback("rough").await, "");
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let enricher = GeminiEnricher::with_base(
            "http://127.0.0.1:9".to_string(),
            "key".to_string(),
            DEFAULT_MODEL.to_string(),
        );

        assert_eq!(enricher.polish("t", "rough", None).await, "rough");
        assert_eq!(enricher.feedback("rough").await, "");
    }

    #[test]
    fn test_response_text_extraction() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" Polished "},{"text":"text"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Polished text"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.into_text(), None);

        let blank: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert_eq!(blank.into_text(), None);
    }
}
