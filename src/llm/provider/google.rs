// src/llm/provider/google.rs
// Google generateContent API adapter (query-parameter auth)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{normalize_error, LlmProvider, ProviderKind, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::error::GatewayError;

const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    model: String,
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

impl GoogleProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// The generateContent API has no system role on this path; the system
    /// instruction is prepended to the prompt text.
    fn request_body(prompt: &str, json_mode: bool, system: Option<&str>) -> GenerateRequest {
        let full_prompt = match system {
            Some(system) => format!("{}\n\n{}", system, prompt),
            None => prompt.to_string(),
        };

        GenerateRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: json_mode.then(|| "application/json".to_string()),
            },
        }
    }

    /// Reply text lives at candidates[0].content.parts[0].text.
    fn extract_text(raw: GenerateResponse) -> Result<String, GatewayError> {
        raw.candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| if p.is_empty() { None } else { p.remove(0).text })
            .ok_or_else(|| GatewayError::provider("google", "no content in response"))
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn send(
        &self,
        prompt: &str,
        json_mode: bool,
        system: Option<&str>,
    ) -> Result<String, GatewayError> {
        let body = Self::request_body(prompt, json_mode, system);
        let url = format!(
            "{}/{}:generateContent?key={}",
            GENERATE_URL, self.model, self.api_key
        );

        debug!("google request: model={}, json_mode={}", self.model, json_mode);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::provider("google", e.to_string()))?;

        if !response.status().is_success() {
            return Err(normalize_error("google", response).await);
        }

        let raw = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| GatewayError::provider("google", e.to_string()))?;

        Self::extract_text(raw)
    }
}
