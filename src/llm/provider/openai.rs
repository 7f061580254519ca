// src/llm/provider/openai.rs
// OpenAI Chat Completions API adapter (bearer-token auth)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{normalize_error, LlmProvider, ProviderKind, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::error::GatewayError;

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the chat/completions request envelope. System instruction is
    /// a leading message with the "system" role; json_mode additionally
    /// sets the native response_format toggle.
    fn request_body(&self, prompt: &str, json_mode: bool, system: Option<&str>) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_OUTPUT_TOKENS,
        });
        if json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    /// Reply text lives at choices[0].message.content.
    fn extract_text(raw: &Value) -> Result<String, GatewayError> {
        raw["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| GatewayError::provider("openai", "no content in response"))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn send(
        &self,
        prompt: &str,
        json_mode: bool,
        system: Option<&str>,
    ) -> Result<String, GatewayError> {
        let body = self.request_body(prompt, json_mode, system);

        debug!("openai request: model={}, json_mode={}", self.model, json_mode);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::provider("openai", e.to_string()))?;

        if !response.status().is_success() {
            return Err(normalize_error("openai", response).await);
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::provider("openai", e.to_string()))?;

        Self::extract_text(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(
            "sk-test".to_string(),
            "https://api.openai.com/v1".to_string(),
            "gpt-4o".to_string(),
        )
    }

    #[test]
    fn request_body_places_system_first() {
        let body = provider().request_body("hello", false, Some("be terse"));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be terse");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 4000);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn json_mode_sets_response_format() {
        let body = provider().request_body("hello", true, None);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn extracts_text_from_choices() {
        let raw = json!({
            "choices": [{ "message": { "role": "assistant", "content": "hi there" } }]
        });
        assert_eq!(OpenAiProvider::extract_text(&raw).unwrap(), "hi there");
    }

    #[test]
    fn missing_content_is_an_error() {
        let raw = json!({ "choices": [] });
        assert!(OpenAiProvider::extract_text(&raw).is_err());
    }
}
