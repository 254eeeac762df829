//! Recovers one JSON value from free-form model output and turns it into typed, validated
//! records. Models wrap JSON in prose and code fences and append commentary after it; the
//! extractor tracks delimiter balance from the first `{` or `[` instead of searching for the
//! last closing brace.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Model output that did not contain a usable structure. Carries the offending text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub raw: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw: raw.into(),
        }
    }
}

/// Shape checks applied after deserialization. Returns a description of the first violation.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate().map_err(|e| format!("item {i}: {e}")))
    }
}

/// Returns the first balanced JSON object or array in `raw`.
///
/// Code-fence markers are removed first. Delimiters inside string literals are ignored.
/// With no opening delimiter, or no balancing close, the cleaned text is returned as-is and
/// the caller's parse reports the failure.
pub fn extract_json(raw: &str) -> String {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let Some((start, open)) = cleaned.char_indices().find(|(_, c)| matches!(c, '{' | '[')) else {
        return cleaned.to_string();
    };
    let close = if open == '{' { '}' } else { ']' };

    let mut balance = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in cleaned[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => balance += 1,
            c if c == close => {
                balance -= 1;
                if balance == 0 {
                    let end = start + i + c.len_utf8();
                    return cleaned[start..end].to_string();
                }
            }
            _ => {}
        }
    }

    cleaned.to_string()
}

/// Extracts, deserializes and validates model output. Any failure is a `ParseError`.
pub fn parse_validated<T>(raw: &str) -> Result<T, ParseError>
where
    T: DeserializeOwned + Validate,
{
    let json = extract_json(raw);
    let value: T = serde_json::from_str(&json)
        .map_err(|e| ParseError::new(format!("model output is not the expected JSON: {e}"), raw))?;
    value
        .validate()
        .map_err(|e| ParseError::new(format!("model output failed validation: {e}"), raw))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_bare_json_is_returned_unchanged() {
        assert_eq!(extract_json(r#"{"a": 1}"#), r#"{"a": 1}"#);
        assert_eq!(extract_json("[1, 2, 3]"), "[1, 2, 3]");
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let raw = "Sure! ```json\n[{\"id\": \"1\"}, {\"id\": \"2\"}]\n``` Hope this helps!";
        assert_eq!(extract_json(raw), r#"[{"id": "1"}, {"id": "2"}]"#);
    }

    #[test]
    fn test_plain_fence_without_language_tag() {
        let raw = "```\n{\"ok\": true}\n```";
        assert_eq!(extract_json(raw), r#"{"ok": true}"#);
    }

    #[test]
    fn test_trailing_commentary_with_braces_is_dropped() {
        let raw = r#"Here you go: {"a": {"b": [1, 2]}} and {"ignored": true}"#;
        assert_eq!(extract_json(raw), r#"{"a": {"b": [1, 2]}}"#);
    }

    #[test]
    fn test_nested_arrays_return_outer_structure() {
        let raw = r#"Result: [[1, [2]], [3]] done [4]"#;
        assert_eq!(extract_json(raw), "[[1, [2]], [3]]");
    }

    #[test]
    fn test_array_of_objects_keeps_outer_array() {
        let raw = r#"[{"learningPath": ["a", "b"]}, {"learningPath": []}] (2 items)"#;
        assert_eq!(
            extract_json(raw),
            r#"[{"learningPath": ["a", "b"]}, {"learningPath": []}]"#
        );
    }

    #[test]
    fn test_delimiters_inside_strings_are_ignored() {
        let raw = r#"note {"title": "C++ [advanced] }", "q": "say \"]\""} trailing }"#;
        assert_eq!(
            extract_json(raw),
            r#"{"title": "C++ [advanced] }", "q": "say \"]\""}"#
        );
    }

    #[test]
    fn test_first_opening_delimiter_wins() {
        let raw = r#"{"wrapper": [1]} [2]"#;
        assert_eq!(extract_json(raw), r#"{"wrapper": [1]}"#);
    }

    #[test]
    fn test_no_structure_returns_trimmed_input() {
        assert_eq!(extract_json("  I cannot help with that.  "), "I cannot help with that.");
    }

    #[test]
    fn test_unbalanced_returns_cleaned_text() {
        assert_eq!(extract_json("prefix [1, 2"), "prefix [1, 2");
    }

    #[test]
    fn test_multibyte_text_around_json() {
        let raw = "Voilà ✨ {\"salary\": \"€50,000\"} — fin";
        assert_eq!(extract_json(raw), "{\"salary\": \"€50,000\"}");
    }

    #[derive(Debug, Deserialize)]
    struct Item {
        n: i32,
    }

    impl Validate for Item {
        fn validate(&self) -> Result<(), String> {
            if self.n < 0 {
                return Err("n must be non-negative".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_parse_validated_accepts_good_output() {
        let items: Vec<Item> = parse_validated("ok: [{\"n\": 1}, {\"n\": 2}]").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].n, 2);
    }

    #[test]
    fn test_parse_validated_reports_syntax_errors_with_raw_text() {
        let raw = "sorry, no JSON today";
        let err = parse_validated::<Vec<Item>>(raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert!(err.message.contains("not the expected JSON"));
    }

    #[test]
    fn test_parse_validated_rejects_wrong_shape() {
        let err = parse_validated::<Vec<Item>>(r#"{"n": 1}"#).unwrap_err();
        assert!(err.message.contains("not the expected JSON"));
    }

    #[test]
    fn test_parse_validated_runs_validation() {
        let err = parse_validated::<Vec<Item>>(r#"[{"n": 1}, {"n": -4}]"#).unwrap_err();
        assert!(err.message.contains("item 1"));
        assert!(err.message.contains("non-negative"));
    }
}
