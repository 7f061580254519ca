// src/llm/provider/mod.rs
// LLM provider trait and adapter construction for multi-provider support

use async_trait::async_trait;
use serde_json::Value;
use std::str::FromStr;

use crate::config::GatewayConfig;
use crate::error::GatewayError;

pub mod anthropic;
pub mod google;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use openai::OpenAiProvider;

/// Generation parameters are fixed constants, not tunable per call.
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 4000;

/// The closed set of supported wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" => Ok(ProviderKind::Google),
            other => Err(format!("unsupported provider: {}", other)),
        }
    }
}

/// Universal transport adapter interface.
///
/// Each adapter owns the provider-specific request envelope, the
/// credential transport, and the extraction of the single text reply.
/// `json_mode` asks the transport to request machine-readable output where
/// the provider has a native flag; the prompt itself has already been
/// augmented by the dispatcher, exactly once.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &'static str;

    fn kind(&self) -> ProviderKind;

    /// Send one prompt, return the raw text reply.
    async fn send(
        &self,
        prompt: &str,
        json_mode: bool,
        system: Option<&str>,
    ) -> Result<String, GatewayError>;
}

/// Build the adapter for the configured active provider. Returns None when
/// that provider has no credential; the dispatcher decides whether that is
/// the simulator path or a hard configuration error.
pub fn build_active(config: &GatewayConfig) -> Option<Box<dyn LlmProvider>> {
    let settings = config.provider(config.active);
    let api_key = settings.api_key.clone()?;

    Some(match config.active {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(
            api_key,
            settings
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            settings.model.clone(),
        )),
        ProviderKind::Anthropic => {
            Box::new(AnthropicProvider::new(api_key, settings.model.clone()))
        }
        ProviderKind::Google => Box::new(GoogleProvider::new(api_key, settings.model.clone())),
    })
}

/// Translate a non-success HTTP response into one normalized error,
/// preferring the upstream error message field over raw status text.
pub(crate) async fn normalize_error(provider: &'static str, response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let message = match response.json::<Value>().await {
        Ok(body) => body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {}", status)),
        Err(_) => format!("HTTP {}", status),
    };
    GatewayError::provider(provider, message)
}
