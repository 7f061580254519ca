// src/llm/recovery.rs
// Structured-output recovery: an ordered chain of parse strategies applied
// to raw model text, short-circuiting on the first success.
//
// None of the strategies validate field-level conformance to the requested
// shape; recovery succeeds as soon as any strategy yields a JSON object.
// Callers must defensively check the fields they need.

use serde_json::Value;
use tracing::debug;

use crate::error::GatewayError;

/// Bound on the raw-text preview carried by an exhaustion error.
const PREVIEW_LEN: usize = 200;

type Strategy = fn(&str) -> Result<Value, String>;

/// Strategies in order of strictness. Bracket scan is the most permissive
/// and always last.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct", direct_parse),
    ("fenced block", fenced_block),
    ("bracket scan", bracket_scan),
];

/// Recover a JSON object from raw model text. Fails with
/// `UnparseableResponse` only after every strategy is exhausted, carrying a
/// truncated preview and the final strategy's parse failure.
pub fn recover(raw: &str) -> Result<Value, GatewayError> {
    let mut last_reason = String::new();
    for (name, strategy) in STRATEGIES {
        match strategy(raw) {
            Ok(value) => {
                debug!("recovered structured output via {} strategy", name);
                return Ok(value);
            }
            Err(reason) => last_reason = reason,
        }
    }

    Err(GatewayError::UnparseableResponse {
        preview: truncate(raw, PREVIEW_LEN),
        reason: last_reason,
    })
}

/// Treat the entire text as a serialized value; accept only objects.
fn direct_parse(text: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| e.to_string())?;
    if value.is_object() {
        Ok(value)
    } else {
        Err("parsed value is not an object".to_string())
    }
}

/// Extract the interior of a fenced code block: greedy match from the
/// first opening fence to the last closing fence in the text. A "json"
/// language tag directly after the opening fence is skipped.
fn fenced_block(text: &str) -> Result<Value, String> {
    let open = text.find("```").ok_or_else(|| "no code fence found".to_string())?;
    let mut interior_start = open + 3;
    if text[interior_start..].starts_with("json") {
        interior_start += 4;
    }

    let close = text[interior_start..]
        .rfind("```")
        .ok_or_else(|| "no closing fence found".to_string())?;

    direct_parse(&text[interior_start..interior_start + close])
}

/// Slice from the first `{` to the last `}` inclusive and parse that.
/// Last resort; no validation beyond "parses as an object".
fn bracket_scan(text: &str) -> Result<Value, String> {
    let start = text.find('{').ok_or_else(|| "no object found in response".to_string())?;
    let end = text.rfind('}').ok_or_else(|| "no object found in response".to_string())?;
    if end < start {
        return Err("no object found in response".to_string());
    }
    direct_parse(&text[start..=end])
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_parse_round_trips_objects() {
        let original = json!({ "suggestions": ["a", "b"], "count": 2 });
        let recovered = recover(&original.to_string()).unwrap();
        assert_eq!(recovered, original);
    }

    #[test]
    fn direct_parse_rejects_primitives() {
        assert!(direct_parse("42").is_err());
        assert!(direct_parse("\"just a string\"").is_err());
        assert!(direct_parse("[1, 2, 3]").is_err());
    }

    #[test]
    fn fenced_block_with_json_tag() {
        let raw = "Here you go:\n```json\n{\"key\": \"value\"}\n```\nHope that helps!";
        let recovered = recover(raw).unwrap();
        assert_eq!(recovered, json!({ "key": "value" }));
    }

    #[test]
    fn fenced_block_without_tag() {
        let raw = "Result:\n```\n{\"ok\": true}\n```";
        let recovered = recover(raw).unwrap();
        assert_eq!(recovered, json!({ "ok": true }));
    }

    #[test]
    fn fenced_match_is_greedy_first_to_last() {
        // Two fenced blocks: the greedy first-to-last match spans both and
        // fails to parse, as does the bracket scan over the same span.
        let raw = "```json\n{\"a\": 1}\n```\nand\n```json\n{\"b\": 2}\n```";
        assert!(fenced_block(raw).is_err());
        assert!(matches!(
            recover(raw),
            Err(GatewayError::UnparseableResponse { .. })
        ));
    }

    #[test]
    fn bracket_scan_finds_embedded_object() {
        let raw = "The analysis suggests {\"rootCause\": \"missing import\"} as the issue.";
        let recovered = recover(raw).unwrap();
        assert_eq!(recovered, json!({ "rootCause": "missing import" }));
    }

    #[test]
    fn exhaustion_raises_with_preview() {
        let raw = "no structured data here at all";
        match recover(raw) {
            Err(GatewayError::UnparseableResponse { preview, reason }) => {
                assert_eq!(preview, raw);
                assert!(!reason.is_empty());
            }
            other => panic!("expected UnparseableResponse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn preview_is_bounded() {
        let raw = "x".repeat(5000);
        match recover(&raw) {
            Err(GatewayError::UnparseableResponse { preview, .. }) => {
                assert_eq!(preview.chars().count(), PREVIEW_LEN);
            }
            other => panic!("expected UnparseableResponse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn never_returns_partial_objects() {
        // Malformed JSON everywhere: must error, not null-fill.
        let raw = "```json\n{\"broken\": \n```";
        assert!(recover(raw).is_err());
    }
}
