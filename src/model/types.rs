use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MAX_PROMPT_CHARS: usize = 1000;

/// Body of `POST /api/generate`.
///
/// Fields of the wrong JSON type deserialize as absent rather than failing
/// the whole body, so a numeric `prompt` is reported as a missing prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Envelope returned by the generation endpoint for both outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl GenerationResponse {
    pub fn success(image_url: String, id: String) -> Self {
        Self {
            success: true,
            image_url: Some(image_url),
            error: None,
            id: Some(id),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(error.into()),
            id: None,
        }
    }
}

/// A finished generation as kept in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub dimensions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const SQUARE: Dimensions = Dimensions::new(1024, 1024);
    pub const PORTRAIT: Dimensions = Dimensions::new(768, 1024);
    pub const LANDSCAPE: Dimensions = Dimensions::new(1024, 768);
    pub const WIDE: Dimensions = Dimensions::new(1152, 648);

    pub const PRESETS: [(&'static str, Dimensions); 4] = [
        ("Square (1:1)", Dimensions::SQUARE),
        ("Portrait (3:4)", Dimensions::PORTRAIT),
        ("Landscape (4:3)", Dimensions::LANDSCAPE),
        ("Wide (16:9)", Dimensions::WIDE),
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions::SQUARE
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Opaque id for a generation: `img_<epoch millis>_<9 random chars>`.
pub fn generation_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("img_{millis}_{}", &suffix[..9])
}
