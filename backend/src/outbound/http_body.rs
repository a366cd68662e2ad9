//! Response body helpers shared by the reqwest adapters.

use serde_json::Value;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Decode a failure body for embedding in error details.
///
/// JSON bodies are returned as-is, any other non-blank body as a JSON string,
/// and blank bodies as `None`.
pub(crate) fn error_body(body: &[u8]) -> Option<Value> {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        return Some(value);
    }
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| Value::String(trimmed.to_owned()))
}

/// Whitespace-collapsed, length-capped rendering of a body for log messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(br#"{"error":{"code":"invalid_client"}}"#.as_slice(), Some(json!({ "error": { "code": "invalid_client" } })))]
    #[case(b"Bad Gateway\n".as_slice(), Some(json!("Bad Gateway")))]
    #[case(b"   ".as_slice(), None)]
    #[case(b"".as_slice(), None)]
    fn error_bodies_keep_provider_content(#[case] body: &[u8], #[case] expected: Option<Value>) {
        assert_eq!(error_body(body), expected);
    }

    #[test]
    fn previews_are_compacted_and_capped() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
        assert_eq!(body_preview(b"a \n  b"), "a b");
    }
}
