// src/config/mod.rs
// Environment-driven configuration, read once at startup and passed into
// the gateway by value. No process-global statics: tests construct their
// own GatewayConfig directly.

use std::path::PathBuf;
use std::str::FromStr;

use crate::llm::provider::ProviderKind;

/// Per-provider connection settings. `api_key` absent means the provider
/// is not usable; `base_url` only applies to the OpenAI-style transport.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
}

/// Full gateway configuration: the active provider selector plus one
/// ProviderConfig per supported wire format, immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub active: ProviderKind,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub google: ProviderConfig,
    pub data_dir: PathBuf,
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => default,
            }
        }
        Err(_) => default,
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let v = v.trim().to_string();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    })
}

impl GatewayConfig {
    /// Load configuration from the environment, honoring a `.env` file if
    /// one is present.
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            tracing::debug!("no .env file found, using environment variables and defaults");
        }

        let active = env_var("SCRIBE_PROVIDER")
            .and_then(|v| match ProviderKind::from_str(&v) {
                Ok(kind) => Some(kind),
                Err(_) => {
                    tracing::warn!("unknown SCRIBE_PROVIDER '{}', defaulting to openai", v);
                    None
                }
            })
            .unwrap_or(ProviderKind::OpenAi);

        Self {
            active,
            openai: ProviderConfig {
                api_key: env_var("OPENAI_API_KEY"),
                base_url: Some(env_var_or(
                    "OPENAI_BASE_URL",
                    "https://api.openai.com/v1".to_string(),
                )),
                model: env_var_or("OPENAI_MODEL", "gpt-4o".to_string()),
            },
            anthropic: ProviderConfig {
                api_key: env_var("ANTHROPIC_API_KEY"),
                base_url: None,
                model: env_var_or("ANTHROPIC_MODEL", "claude-3-5-sonnet-20241022".to_string()),
            },
            google: ProviderConfig {
                api_key: env_var("GOOGLE_API_KEY"),
                base_url: None,
                model: env_var_or("GOOGLE_MODEL", "gemini-pro".to_string()),
            },
            data_dir: env_var("SCRIBE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    dirs::data_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join("scribe")
                }),
        }
    }

    /// Settings for one provider.
    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Google => &self.google,
        }
    }

    /// True when at least one provider has a credential. False activates
    /// the offline simulator path.
    pub fn any_credential(&self) -> bool {
        self.openai.api_key.is_some()
            || self.anthropic.api_key.is_some()
            || self.google.api_key.is_some()
    }

    /// A config with no credentials at all, rooted at `data_dir`. Used by
    /// tests and by callers that want the simulator unconditionally.
    pub fn offline(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            active: ProviderKind::OpenAi,
            openai: ProviderConfig {
                api_key: None,
                base_url: Some("https://api.openai.com/v1".to_string()),
                model: "gpt-4o".to_string(),
            },
            anthropic: ProviderConfig {
                api_key: None,
                base_url: None,
                model: "claude-3-5-sonnet-20241022".to_string(),
            },
            google: ProviderConfig {
                api_key: None,
                base_url: None,
                model: "gemini-pro".to_string(),
            },
            data_dir: data_dir.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_config_has_no_credentials() {
        let config = GatewayConfig::offline("/tmp/scribe-test");
        assert!(!config.any_credential());
        assert_eq!(config.active, ProviderKind::OpenAi);
    }

    #[test]
    fn provider_lookup_matches_kind() {
        let mut config = GatewayConfig::offline("/tmp/scribe-test");
        config.google.api_key = Some("g-key".to_string());
        assert!(config.provider(ProviderKind::Google).api_key.is_some());
        assert!(config.provider(ProviderKind::Anthropic).api_key.is_none());
        assert!(config.any_credential());
    }
}
