mod style;
mod types;

pub use style::{Style, StyleCatalog};
pub use types::{
    Dimensions, GeneratedImage, GenerationRequest, GenerationResponse, MAX_PROMPT_CHARS,
    generation_id,
};
