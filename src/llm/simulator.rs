// src/llm/simulator.rs
// Offline simulator: deterministic, schema-aware canned responses used
// when no provider credential is configured. A pattern-matched stand-in
// for exercising the UI without network access, not a general mock.

use serde_json::{json, Value};
use tokio::time::{sleep, Duration};
use tracing::debug;

use super::types::CompletionResult;

/// Artificial latency to mimic a provider round trip.
const SIMULATED_LATENCY: Duration = Duration::from_millis(500);

/// Number of prompt characters echoed into placeholder suggestions.
const PROMPT_ECHO_LEN: usize = 100;

/// Produce a canned response for the prompt. Always succeeds.
pub async fn simulate(prompt: &str, shape: Option<&Value>) -> CompletionResult {
    sleep(SIMULATED_LATENCY).await;
    debug!("offline simulator handling prompt ({} chars)", prompt.len());

    if let Some(shape) = shape {
        let properties = &shape["properties"];

        if properties.get("suggestions").is_some() {
            let echo: String = prompt.chars().take(PROMPT_ECHO_LEN).collect();
            return CompletionResult::Structured(json!({
                "suggestions": [
                    format!("// AI generated code suggestion 1\n{}", echo),
                    format!("// AI generated code suggestion 2\n{}", echo),
                    format!("// AI generated code suggestion 3\n{}", echo),
                ]
            }));
        }

        if properties.get("refactorings").is_some() {
            return CompletionResult::Structured(json!({
                "refactorings": [{
                    "title": "Simplify Code Structure",
                    "category": "simplification",
                    "explanation": "This refactoring improves code readability by simplifying the structure.",
                    "impact": "Reduces complexity by 20%",
                    "refactoredCode": "// Refactored code will appear here"
                }]
            }));
        }

        if properties.get("rootCause").is_some() {
            return CompletionResult::Structured(json!({
                "rootCause": "The error occurs due to an undefined variable or missing import.",
                "lineNumber": 1,
                "suggestion": "Ensure all variables are properly declared before use.",
                "fixedCode": "// Fixed code will appear here"
            }));
        }
    }

    if prompt.contains("execute") || prompt.contains("Execute") {
        return CompletionResult::Text(
            "Code executed successfully.\nOutput: Hello, World!".to_string(),
        );
    }

    CompletionResult::Text(
        "AI response: Please configure your AI provider API key in .env file for actual AI functionality."
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn suggestions_shape_returns_three_placeholders() {
        let shape = json!({ "type": "object", "properties": { "suggestions": { "type": "array" } } });
        let result = simulate("fn main() {}", Some(&shape)).await;
        let value = result.as_structured().unwrap();
        let suggestions = value["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].as_str().unwrap().contains("fn main() {}"));
    }

    #[tokio::test]
    async fn refactorings_shape_returns_one_record() {
        let shape = json!({ "properties": { "refactorings": {} } });
        let result = simulate("refactor this", Some(&shape)).await;
        let value = result.as_structured().unwrap();
        assert_eq!(value["refactorings"].as_array().unwrap().len(), 1);
        assert_eq!(value["refactorings"][0]["category"], "simplification");
    }

    #[tokio::test]
    async fn root_cause_shape_returns_debug_record() {
        let shape = json!({ "properties": { "rootCause": {} } });
        let result = simulate("why does this fail", Some(&shape)).await;
        let value = result.as_structured().unwrap();
        assert!(value["rootCause"].as_str().unwrap().contains("undefined variable"));
        assert_eq!(value["lineNumber"], 1);
    }

    #[tokio::test]
    async fn execution_prompt_returns_canned_output() {
        let result = simulate("Please execute this program", None).await;
        assert!(result.as_text().unwrap().contains("executed successfully"));
    }

    #[tokio::test]
    async fn fallback_is_a_configuration_hint() {
        let result = simulate("hello", None).await;
        assert!(result.as_text().unwrap().contains("configure your AI provider"));
    }
}
