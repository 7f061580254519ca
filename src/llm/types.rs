// src/llm/types.rs
// Provider-neutral request and result types

use serde_json::Value;

/// One completion request from the editor UI.
///
/// `response_shape`, when present, is a JSON-Schema-like object describing
/// an object type with named properties. It steers prompt augmentation and
/// simulator branching; conformance is not enforced on the result.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub response_shape: Option<Value>,
    pub system: Option<String>,
}

impl CompletionRequest {
    /// Plain-text request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_shape: None,
            system: None,
        }
    }

    pub fn with_shape(mut self, shape: Value) -> Self {
        self.response_shape = Some(shape);
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Either raw text or a structured value. Heuristic recovery is
/// transparent: a `Structured` result looks the same whether the provider
/// returned clean JSON or prose that needed extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    Text(String),
    Structured(Value),
}

impl CompletionResult {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CompletionResult::Text(text) => Some(text),
            CompletionResult::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            CompletionResult::Text(_) => None,
            CompletionResult::Structured(value) => Some(value),
        }
    }

    /// Flatten to a displayable string; structured values are serialized.
    pub fn to_message_text(&self) -> String {
        match self {
            CompletionResult::Text(text) => text.clone(),
            CompletionResult::Structured(value) => value.to_string(),
        }
    }
}
