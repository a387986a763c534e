use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use anyhow::Context;

use crate::model::StyleCatalog;

const DEFAULT_UPSTREAM_URL: &str = "https://oi-server.onrender.com/chat/completions";
const DEFAULT_UPSTREAM_MODEL: &str = "replicate/black-forest-labs/flux-1.1-pro";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub upstream: UpstreamConfig,
    pub styles: StyleCatalog,
}

/// Where and how generation requests are forwarded.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub endpoint: String,
    pub model: String,
    pub customer_id: String,
    pub api_token: String,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("customer_id", &"<redacted>")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("SERVER_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".into())
            .parse()
            .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080));

        let endpoint = lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let model = lookup("UPSTREAM_MODEL").unwrap_or_else(|| DEFAULT_UPSTREAM_MODEL.to_string());
        let customer_id = lookup("UPSTREAM_CUSTOMER_ID")
            .filter(|v| !v.trim().is_empty())
            .context("UPSTREAM_CUSTOMER_ID must be set")?;
        let api_token = lookup("UPSTREAM_API_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .context("UPSTREAM_API_TOKEN must be set")?;

        Ok(Self {
            listen_addr,
            upstream: UpstreamConfig {
                endpoint,
                model,
                customer_id,
                api_token,
            },
            styles: StyleCatalog::default(),
        })
    }
}
