// src/error.rs
// Gateway error taxonomy - configuration vs transport vs parse failures

use thiserror::Error;

/// Errors surfaced by the gateway and its persistence layer.
///
/// The no-provider-configured case is deliberately NOT an error: the
/// dispatcher soft-degrades to the offline simulator instead. Once a real
/// provider has been invoked, failures are never converted into fabricated
/// success values.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The selected provider has no credential while another provider does.
    /// Fatal to the call; never silently downgraded to another provider.
    #[error("{provider} API key not configured")]
    Configuration { provider: String },

    /// Upstream HTTP/network failure. Not retried by the gateway.
    #[error("{provider} API error: {message}")]
    Provider { provider: String, message: String },

    /// Every recovery strategy was exhausted against the raw model text.
    #[error("failed to parse model response ({reason}): {preview}")]
    UnparseableResponse { preview: String, reason: String },

    /// Local store I/O failure.
    #[error("store error: {0}")]
    Store(#[from] std::io::Error),

    /// A record id was not present in its collection.
    #[error("record not found: {0}")]
    NotFound(String),
}

impl GatewayError {
    pub fn configuration(provider: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
