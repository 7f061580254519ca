// src/llm/provider/anthropic.rs
// Anthropic Messages API adapter (x-api-key auth, versioned header)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{normalize_error, LlmProvider, ProviderKind, MAX_OUTPUT_TOKENS};
use crate::error::GatewayError;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// Build the Messages API envelope. System instruction is a top-level
    /// field, not a message role. The API has no native JSON toggle, so
    /// json_mode relies entirely on the augmented prompt.
    fn request_body(&self, prompt: &str, system: Option<&str>) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }
        body
    }

    /// Reply text lives at content[0].text.
    fn extract_text(raw: &Value) -> Result<String, GatewayError> {
        raw["content"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::provider("anthropic", "no content in response"))
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn send(
        &self,
        prompt: &str,
        json_mode: bool,
        system: Option<&str>,
    ) -> Result<String, GatewayError> {
        let body = self.request_body(prompt, system);

        debug!("anthropic request: model={}, json_mode={}", self.model, json_mode);

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::provider("anthropic", e.to_string()))?;

        if !response.status().is_success() {
            return Err(normalize_error("anthropic", response).await);
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::provider("anthropic", e.to_string()))?;

        Self::extract_text(&raw)
    }
}
