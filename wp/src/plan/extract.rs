//! Best-effort JSON extraction from generative free text
//!
//! Suggestion backends wrap their JSON in prose or markdown more often
//! than not. The fallback chain: fenced code block first, then the
//! substring between the first `{` and the last `}`, then give up.

use serde_json::Value;
use tracing::debug;

use crate::error::PlanError;

/// Extract and parse a JSON object from free text.
///
/// Never panics; a text with no parseable object yields
/// [`PlanError::MalformedResponse`].
pub fn extract_json(text: &str) -> Result<Value, PlanError> {
    if let Some(block) = fenced_block(text) {
        debug!(len = block.len(), "extract_json: trying fenced block");
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    if let Some(braced) = brace_substring(text) {
        debug!(len = braced.len(), "extract_json: trying brace substring");
        if let Ok(value) = serde_json::from_str::<Value>(braced) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    Err(PlanError::MalformedResponse(
        "no JSON object found in response text".to_string(),
    ))
}

/// Content of the first fenced code block, tolerating a language tag
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip the language tag line if present
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Substring between the first `{` and the last `}`
fn brace_substring(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        let value = extract_json(r#"{"order": ["a"]}"#).unwrap();
        assert_eq!(value["order"][0], "a");
    }

    #[test]
    fn test_fenced_block_with_language_tag() {
        let text = "Here is your plan:\n```json\n{\"order\": [\"a\", \"b\"]}\n```\nEnjoy!";
        let value = extract_json(text).unwrap();
        assert_eq!(value["order"][1], "b");
    }

    #[test]
    fn test_fenced_block_without_language_tag() {
        let text = "```\n{\"stayArea\": \"Ella\"}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["stayArea"], "Ella");
    }

    #[test]
    fn test_prose_wrapped_braces() {
        let text = "Sure! The plan is {\"order\": []} - let me know if it helps.";
        let value = extract_json(text).unwrap();
        assert!(value["order"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_broken_fence_falls_back_to_braces() {
        // Fence does not hold an object but the prose carries one
        let text = "```json\nnull\n```\n{\"order\": [\"x\"]}";
        let value = extract_json(text).unwrap();
        assert_eq!(value["order"][0], "x");
    }

    #[test]
    fn test_no_json_fails() {
        let err = extract_json("I could not produce a plan, sorry.").unwrap_err();
        assert!(matches!(err, PlanError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_json_fails() {
        assert!(extract_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(extract_json("").is_err());
    }
}
