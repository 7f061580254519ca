// src/llm/gateway.rs
// Gateway dispatcher: provider selection, credential preconditions,
// soft-degrade to the offline simulator, recovery for structured requests.

use tracing::{debug, warn};

use super::provider::{self, LlmProvider};
use super::types::{CompletionRequest, CompletionResult};
use super::{prompt, recovery, simulator};
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Uniform dispatch across providers with incompatible wire formats.
///
/// The adapter for the active provider is selected once at construction.
/// With no credentials configured anywhere the gateway soft-degrades to
/// the offline simulator; with credentials present but the selected
/// provider's missing, every call is a hard configuration error.
pub struct Gateway {
    config: GatewayConfig,
    provider: Option<Box<dyn LlmProvider>>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        let provider = provider::build_active(&config);
        match &provider {
            Some(p) => debug!("gateway dispatching to {}", p.name()),
            None if config.any_credential() => warn!(
                "selected provider {} has no credential; calls will fail",
                config.active.as_str()
            ),
            None => debug!("no provider configured, offline simulator active"),
        }
        Self { config, provider }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run one completion. Transport failures are surfaced as
    /// `Provider` errors and never retried here; retry policy belongs to
    /// the caller.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResult, GatewayError> {
        if !self.config.any_credential() {
            // Designed default, not a masked failure.
            return Ok(simulator::simulate(&request.prompt, request.response_shape.as_ref()).await);
        }

        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| GatewayError::configuration(self.config.active.as_str()))?;

        // Augmentation happens exactly once, here; adapters only set the
        // native machine-readable flag where one exists.
        let prompt = match &request.response_shape {
            Some(shape) => prompt::augment(&request.prompt, shape, provider.kind()),
            None => request.prompt.clone(),
        };

        let raw = provider
            .send(
                &prompt,
                request.response_shape.is_some(),
                request.system.as_deref(),
            )
            .await?;

        match &request.response_shape {
            Some(_) => Ok(CompletionResult::Structured(recovery::recover(&raw)?)),
            None => Ok(CompletionResult::Text(raw)),
        }
    }
}
