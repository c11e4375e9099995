//! Tolerant decoding of chat-completion replies. Local model servers differ
//! in where the answer lands and how much markdown they wrap around it, so
//! decoding probes the known shapes instead of deserializing a fixed struct.

use serde_json::Value;

use crate::client::ExtractError;

/// Pull the answer out of a completion payload, wherever the server put it.
/// Checked in order: `choices[0].message.content`, `choices[0].message.parsed`,
/// `choices[0].text`, `output_text`, `output[0].content[0].text`.
pub fn extract_content(payload: &Value) -> Option<Value> {
    let message = payload.pointer("/choices/0/message");
    if let Some(content) = message.and_then(|m| m.get("content")) {
        if !content.is_null() {
            return Some(content.clone());
        }
    }
    if let Some(parsed) = message.and_then(|m| m.get("parsed")) {
        if !parsed.is_null() {
            return Some(parsed.clone());
        }
    }
    for path in ["/choices/0/text", "/output_text", "/output/0/content/0/text"] {
        if let Some(v) = payload.pointer(path) {
            if !v.is_null() {
                return Some(v.clone());
            }
        }
    }
    None
}

/// Flatten a content value to plain text. Multimodal replies arrive as an
/// array of parts; text parts are joined with newlines, the rest dropped.
pub fn content_to_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let texts: Vec<&str> = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(o) => o.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
            Some(texts.join("\n"))
        }
        _ => None,
    }
}

/// Coerce a content value into a JSON object: already-parsed objects pass
/// through, text is parsed after stripping markdown code fences, and as a
/// last resort the first `{ … }` block inside the text is tried.
pub fn parse_json_content(content: &Value) -> Result<Value, ExtractError> {
    if content.is_object() {
        return Ok(content.clone());
    }
    let text = content_to_text(content).ok_or(ExtractError::InvalidJson)?;
    let stripped = strip_code_fences(&text);

    if let Ok(value) = serde_json::from_str::<Value>(&stripped) {
        if value.is_object() {
            return Ok(value);
        }
    }
    if let Some(block) = first_object_block(&stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }
    Err(ExtractError::InvalidJson)
}

fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Span from the first `{` to the last `}`, if both exist in order.
fn first_object_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Normalize a caller-supplied MIME type for the data URL. Anything that is
/// not an image type or a PDF falls back to JPEG, the common case for
/// phone-camera receipts.
pub fn resolve_mime(mime: Option<&str>) -> String {
    let normalized = mime.map(|m| m.trim().to_ascii_lowercase()).unwrap_or_default();
    if normalized.starts_with("image/") || normalized == "application/pdf" {
        normalized
    } else {
        "image/jpeg".to_string()
    }
}
