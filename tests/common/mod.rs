#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use prompt_image_service::{
    AppConfig, ImageBackend, StyleCatalog, UpstreamConfig,
    error::ServiceError,
    upstream::UpstreamReply,
};

pub fn test_config(endpoint: &str) -> AppConfig {
    AppConfig {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        upstream: UpstreamConfig {
            endpoint: endpoint.to_string(),
            model: "test/flux".to_string(),
            customer_id: "cus_test".to_string(),
            api_token: "token-123".to_string(),
        },
        styles: StyleCatalog::default(),
    }
}

pub enum Scripted {
    Reply { status: u16, body: Option<Value> },
    Fail(String),
    Panic,
}

/// Backend that replays a scripted reply and records every prompt it sees.
pub struct StubBackend {
    scripted: Scripted,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new(scripted: Scripted) -> Arc<Self> {
        Arc::new(Self {
            scripted,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn content(content: &str) -> Arc<Self> {
        Self::new(Scripted::Reply {
            status: 200,
            body: Some(serde_json::json!({
                "choices": [{"message": {"content": content}}]
            })),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ImageBackend for StubBackend {
    async fn request_image(&self, enhanced_prompt: &str) -> Result<UpstreamReply, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(enhanced_prompt.to_string());
        match &self.scripted {
            Scripted::Reply { status, body } => Ok(UpstreamReply {
                status: *status,
                body: body.clone(),
            }),
            Scripted::Fail(message) => Err(ServiceError::Transport(message.clone())),
            Scripted::Panic => panic!("backend exploded"),
        }
    }
}
