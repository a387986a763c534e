use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static EMBEDDED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("embedded url pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("invalid response structure")]
    InvalidStructure,
    #[error("no valid image URL found")]
    NoImageUrl,
}

/// Pulls the image URL out of `choices[0].message.content`.
///
/// Content that starts with a scheme is taken whole; otherwise the first
/// `http(s)://` run of non-whitespace inside the text is used.
pub fn extract_image_url(body: &Value) -> Result<String, ExtractionError> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .ok_or(ExtractionError::InvalidStructure)?;

    if content.starts_with("http://") || content.starts_with("https://") {
        return Ok(content.to_string());
    }

    EMBEDDED_URL
        .find(content)
        .map(|m| m.as_str().to_string())
        .ok_or(ExtractionError::NoImageUrl)
}
