mod client;
mod extract;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;

pub use client::UpstreamClient;
pub use extract::{ExtractionError, extract_image_url};

/// Raw outcome of one upstream call: HTTP status plus the parsed body.
///
/// The body is only read when the status is a success.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that turns an enhanced prompt into an upstream reply.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn request_image(&self, enhanced_prompt: &str) -> Result<UpstreamReply, ServiceError>;
}
