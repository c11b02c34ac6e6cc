//! Turns an inbound request body into Markdown text ready for compilation.
//!
//! Bodies arrive either as plain Markdown or as JSON carrying a `markdown`
//! field, and the Markdown itself may be base64 encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::InputError;

/// Shortest first line accepted for multi-line (MIME style) base64.
const MIN_WRAPPED_LINE_LEN: usize = 16;

/// Extracts Markdown from a request body.
///
/// JSON bodies are only considered when `content_type` says so; a JSON body
/// that fails to parse is treated as plain Markdown.
pub fn extract_markdown(body: &str, content_type: Option<&str>) -> Result<String, InputError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));

    let markdown = if is_json {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("markdown")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .ok_or(InputError::MissingMarkdown)?,
            Err(e) => {
                log::warn!("JSON body failed to parse ({e}), treating it as markdown");
                body.to_string()
            }
        }
    } else {
        body.to_string()
    };

    if markdown.trim().is_empty() {
        return Err(InputError::Empty);
    }
    Ok(normalize_markdown(markdown))
}

/// Decodes `text` if it looks like base64 of UTF-8 content, otherwise returns it unchanged.
pub fn normalize_markdown(text: String) -> String {
    if !looks_like_base64(&text) {
        return text;
    }
    match decode_base64(&text) {
        Ok(decoded) => {
            log::info!("decoded base64 payload ({} bytes)", decoded.len());
            decoded
        }
        Err(e) => {
            log::debug!("base64-shaped payload kept as text: {e}");
            text
        }
    }
}

/// Heuristic check for base64-encoded content.
///
/// Whitespace is ignored for the alphabet and padding checks. When the input
/// spans several non-empty lines, they must look like wrapped base64: a first
/// line of reasonable length, repeated exactly by every line but the last.
pub fn looks_like_base64(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || compact.len() % 4 != 0 {
        return false;
    }

    let body = compact.trim_end_matches('=');
    if compact.len() - body.len() > 2 || body.is_empty() {
        return false;
    }
    if !body
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    {
        return false;
    }

    let lines: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
    if lines.len() > 1 {
        let width = lines[0].len();
        if width < MIN_WRAPPED_LINE_LEN {
            return false;
        }
        if lines[..lines.len() - 1].iter().any(|line| line.len() != width) {
            return false;
        }
    }
    true
}

/// Decodes standard base64 (whitespace ignored) into UTF-8 text.
pub fn decode_base64(text: &str) -> Result<String, InputError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| InputError::InvalidBase64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| InputError::NotUtf8)
}
