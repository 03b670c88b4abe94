//! Shared response parsing utilities for LLM outputs
//!
//! Structured output normally arrives as bare JSON, but fenced or embedded JSON is
//! accepted as well.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::LlmError;

/// Utilities for extracting and parsing JSON from LLM responses.
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a JSON object from an LLM response.
    ///
    /// Candidate order:
    /// 1) The full trimmed content.
    /// 2) A fenced JSON code block (```json ... ```).
    /// 3) Any fenced code block (``` ... ```).
    /// 4) The first JSON object embedded in the text.
    ///
    /// The first candidate that is syntactically valid JSON decides the outcome. It must be an
    /// object matching `T`; arrays and scalars are rejected even when serde could read them.
    pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, LlmError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(LlmError::InvalidResponse(String::new()));
        }

        let candidates = [
            Some(trimmed.to_string()),
            Self::extract_fenced_json(trimmed),
            Self::extract_any_fenced_code(trimmed),
            Self::extract_first_json_object(trimmed),
        ];
        for json in candidates.into_iter().flatten() {
            if let Ok(value) = serde_json::from_str::<Value>(&json) {
                return Self::decode_object(value);
            }
        }

        Err(LlmError::InvalidResponse(
            "Failed to extract valid JSON from LLM response".to_string(),
        ))
    }

    fn decode_object<T: DeserializeOwned>(value: Value) -> Result<T, LlmError> {
        if !value.is_object() {
            return Err(LlmError::InvalidResponse(format!(
                "LLM response must be a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|err| {
            LlmError::InvalidResponse(format!("LLM response does not match the schema: {err}"))
        })
    }

    /// Extract a ```json fenced code block.
    pub fn extract_fenced_json(content: &str) -> Option<String> {
        Self::extract_fenced_block(content, Some("json"))
    }

    /// Extract any fenced code block.
    pub fn extract_any_fenced_code(content: &str) -> Option<String> {
        Self::extract_fenced_block(content, None)
    }

    /// Extract the first valid JSON object from text.
    pub fn extract_first_json_object(content: &str) -> Option<String> {
        for (idx, _) in content.match_indices('{') {
            let candidate = &content[idx..];
            let mut de = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();
            if let Some(Ok(_value)) = de.next() {
                let end = de.byte_offset();
                if end > 0 && end <= candidate.len() {
                    return Some(candidate[..end].to_string());
                }
            }
        }
        None
    }

    fn extract_fenced_block(content: &str, language: Option<&str>) -> Option<String> {
        let fence = "```";
        let mut search = content;

        loop {
            let start = search.find(fence)?;
            let after_start = &search[start + fence.len()..];

            let line_end = after_start.find('\n')?;
            let lang_tag = after_start[..line_end].trim();
            let rest = &after_start[line_end + 1..];

            if let Some(expected) = language
                && !lang_tag.eq_ignore_ascii_case(expected)
            {
                search = after_start;
                continue;
            }

            let end = rest.find(fence)?;
            return Some(rest[..end].trim().to_string());
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
