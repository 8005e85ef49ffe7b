//! Gemini-backed refinement of fuzzy matches.
//!
//! Asks the Generative Language API for small corrections to a candidate
//! match's bounding box and confidence. Requires the GEMINI_API_KEY
//! environment variable. Every call is attempted exactly once; callers fall
//! back to the unrefined match on any error.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use docanchor_core::{MatchResult, Vertex};

use crate::locator::FragmentMatch;
use crate::refine::{RefineBackend, RefineError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Refinement backend using Google's Generative Language API.
pub struct GeminiRefiner {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// The model's reply; every key is optional so a partial reply still merges
/// against the candidate instead of failing.
#[derive(Debug, Deserialize)]
struct RefinedPayload {
    field: Option<String>,
    value: Option<String>,
    bounding_box: Option<Vec<Vertex>>,
    page: Option<u32>,
    confidence: Option<f64>,
}

impl GeminiRefiner {
    /// Create a refiner taking the API key from GEMINI_API_KEY.
    pub fn from_env(model: impl Into<String>) -> Self {
        GeminiRefiner {
            client: reqwest::Client::new(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: model.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn prompt(field: &str, value: &str, candidate: &FragmentMatch) -> String {
        let bbox = serde_json::to_string(&candidate.bounding_box).unwrap_or_default();
        format!(
            "You are a document understanding AI.\n\n\
             A field labeled \"{field}\" has the expected value \"{value}\".\n\
             The best OCR match is \"{text}\" from page {page} with bounding box {bbox}.\n\n\
             Return a JSON object like:\n\
             {{\"field\": \"...\", \"value\": \"...\", \"bounding_box\": [...], \
             \"page\": ..., \"confidence\": ...}}\n\n\
             Make small corrections to the bounding box and confidence if needed.",
            text = candidate.text,
            page = candidate.page,
        )
    }

    /// Parse a model reply into a complete [`MatchResult`], filling anything
    /// the model left out from the inputs and the candidate.
    fn parse_reply(
        field: &str,
        value: &str,
        candidate: &FragmentMatch,
        reply: &str,
    ) -> Result<MatchResult, RefineError> {
        let json = extract_json(reply)
            .ok_or_else(|| RefineError::MalformedReply("no JSON object in reply".into()))?;
        let payload: RefinedPayload = serde_json::from_str(json)
            .map_err(|e| RefineError::MalformedReply(e.to_string()))?;

        Ok(MatchResult {
            field: Some(payload.field.unwrap_or_else(|| field.to_string())),
            value: payload.value.unwrap_or_else(|| value.to_string()),
            bounding_box: payload
                .bounding_box
                .unwrap_or_else(|| candidate.bounding_box.clone()),
            page: Some(payload.page.unwrap_or(candidate.page)),
            confidence: payload
                .confidence
                .unwrap_or(candidate.confidence)
                .clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl RefineBackend for GeminiRefiner {
    async fn refine(
        &self,
        field: &str,
        value: &str,
        candidate: &FragmentMatch,
    ) -> Result<MatchResult, RefineError> {
        let api_key = self.api_key.as_ref().ok_or(RefineError::MissingApiKey)?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: Self::prompt(field, value, candidate) }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 1024,
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!("{API_BASE}/{}:generateContent?key={api_key}", self.model);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefineError::Api { status: status.as_u16(), body });
        }

        let reply: GeminiResponse = response.json().await?;
        let text = reply
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(RefineError::EmptyReply)?;

        Self::parse_reply(field, value, candidate, &text)
    }
}

/// Pull a JSON object out of a model reply that may wrap it in a Markdown
/// code fence or surrounding prose.
fn extract_json(text: &str) -> Option<&str> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    static OBJECT: OnceLock<Regex> = OnceLock::new();

    let fence = FENCE
        .get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("invalid regex"));
    if let Some(c) = fence.captures(text) {
        return c.get(1).map(|m| m.as_str());
    }

    let object = OBJECT.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("invalid regex"));
    object.find(text).map(|m| m.as_str())
}
