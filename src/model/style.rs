use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    Photorealistic,
    Artistic,
    DigitalArt,
    Anime,
    OilPainting,
    Watercolor,
    Sketch,
    Minimal,
}

impl Style {
    pub const ALL: [Style; 8] = [
        Style::Photorealistic,
        Style::Artistic,
        Style::DigitalArt,
        Style::Anime,
        Style::OilPainting,
        Style::Watercolor,
        Style::Sketch,
        Style::Minimal,
    ];

    /// Wire key, as sent in `GenerationRequest::style`.
    pub fn key(self) -> &'static str {
        match self {
            Style::Photorealistic => "photorealistic",
            Style::Artistic => "artistic",
            Style::DigitalArt => "digital-art",
            Style::Anime => "anime",
            Style::OilPainting => "oil-painting",
            Style::Watercolor => "watercolor",
            Style::Sketch => "sketch",
            Style::Minimal => "minimal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Style::Photorealistic => "Photorealistic",
            Style::Artistic => "Artistic",
            Style::DigitalArt => "Digital Art",
            Style::Anime => "Anime Style",
            Style::OilPainting => "Oil Painting",
            Style::Watercolor => "Watercolor",
            Style::Sketch => "Sketch",
            Style::Minimal => "Minimalist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Style::Photorealistic => {
                "photorealistic, high quality, detailed, professional photography"
            }
            Style::Artistic => "artistic, creative, expressive, fine art",
            Style::DigitalArt => "digital art, modern, vibrant, stylized",
            Style::Anime => "anime style, manga, Japanese animation style",
            Style::OilPainting => "oil painting style, classical art, brush strokes, artistic",
            Style::Watercolor => "watercolor painting, soft colors, artistic medium",
            Style::Sketch => "pencil sketch, drawing, artistic lines, black and white",
            Style::Minimal => "minimalist, clean, simple, modern design",
        }
    }
}

/// Style key to descriptive phrase table used to enhance prompts.
///
/// Lookups for keys that are not in the table resolve to the fallback
/// phrase, so enhancement never fails.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    phrases: BTreeMap<String, String>,
    fallback: String,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        let phrases = Style::ALL
            .into_iter()
            .map(|style| (style.key().to_string(), style.description().to_string()))
            .collect();
        Self {
            phrases,
            fallback: Style::default().description().to_string(),
        }
    }
}

impl StyleCatalog {
    pub fn new(phrases: BTreeMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            phrases,
            fallback: fallback.into(),
        }
    }

    pub fn describe(&self, style: Option<&str>) -> &str {
        style
            .and_then(|key| self.phrases.get(key))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn enhance(&self, prompt: &str, style: Option<&str>) -> String {
        format!("{prompt}, {}", self.describe(style))
    }
}
