use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    config::UpstreamConfig,
    error::ServiceError,
    upstream::{ImageBackend, UpstreamReply},
};

const CUSTOMER_ID_HEADER: &str = "customerid";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat-completions style client for the image generation service.
///
/// One POST per call. No retries and no explicit timeout.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    endpoint: String,
    model: String,
    client: Client,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CUSTOMER_ID_HEADER),
            header_value(&config.customer_id)?,
        );
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.api_token))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            client,
        })
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, ServiceError> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|e| ServiceError::Config(format!("upstream header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

#[async_trait]
impl ImageBackend for UpstreamClient {
    async fn request_image(&self, enhanced_prompt: &str) -> Result<UpstreamReply, ServiceError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: enhanced_prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %text, "AI API error");
            return Ok(UpstreamReply {
                status: status.as_u16(),
                body: None,
            });
        }

        let body: Value = response.json().await?;
        debug!(%body, "AI API response");

        Ok(UpstreamReply {
            status: status.as_u16(),
            body: Some(body),
        })
    }
}
