// src/llm/prompt.rs
// Schema-guided prompt augmentation, phrased per provider.
//
// Providers do not reliably honor structural constraints from a side
// channel alone; the in-prompt instruction is required even where a native
// JSON mode exists. The dispatcher applies this exactly once per request.

use serde_json::Value;

use super::provider::ProviderKind;

/// Append the provider-phrased instruction that the reply must be a single
/// JSON object conforming to `shape`. The phrasing differs per provider;
/// the semantic content does not.
pub fn augment(prompt: &str, shape: &Value, kind: ProviderKind) -> String {
    let schema = shape.to_string();
    match kind {
        ProviderKind::OpenAi => format!(
            "{}\n\nIMPORTANT: You must respond with a valid JSON object only. \
             Do not include any markdown formatting or explanation outside the JSON. \
             The JSON must match this schema: {}",
            prompt, schema
        ),
        ProviderKind::Anthropic | ProviderKind::Google => format!(
            "{}\n\nPlease respond with a valid JSON object matching this schema: {}",
            prompt, schema
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape() -> Value {
        json!({
            "type": "object",
            "properties": { "suggestions": { "type": "array" } }
        })
    }

    #[test]
    fn augmented_prompt_keeps_original_text() {
        for kind in [ProviderKind::OpenAi, ProviderKind::Anthropic, ProviderKind::Google] {
            let augmented = augment("complete this code", &shape(), kind);
            assert!(augmented.starts_with("complete this code"));
            assert!(augmented.contains("JSON object"));
        }
    }

    #[test]
    fn augmented_prompt_embeds_serialized_schema() {
        let shape = shape();
        for kind in [ProviderKind::OpenAi, ProviderKind::Anthropic, ProviderKind::Google] {
            let augmented = augment("p", &shape, kind);
            assert!(augmented.contains(&shape.to_string()));
        }
    }

    #[test]
    fn phrasing_differs_only_in_wording() {
        let shape = shape();
        let openai = augment("p", &shape, ProviderKind::OpenAi);
        let anthropic = augment("p", &shape, ProviderKind::Anthropic);
        let google = augment("p", &shape, ProviderKind::Google);

        // Same logical request, provider-specific wording.
        assert_ne!(openai, anthropic);
        assert_eq!(anthropic, google);
        for augmented in [&openai, &anthropic, &google] {
            assert!(augmented.contains("valid JSON object"));
        }
    }
}
