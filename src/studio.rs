use std::path::{Path, PathBuf};

use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    history::{HistoryError, HistoryStore, Storage},
    model::{Dimensions, GeneratedImage, GenerationRequest, GenerationResponse, Style},
};

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Please enter a prompt")]
    EmptyPrompt,
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("no image with id {0} in history")]
    UnknownImage(String),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("download io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationSettings {
    pub dimensions: Dimensions,
    pub style: Style,
}

/// Thin HTTP client for `POST /api/generate`.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    endpoint: String,
    client: Client,
}

impl GeneratorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }

    /// Sends the request and decodes the envelope whatever the HTTP status.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?
            .json()
            .await
    }

    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Root of the UI state. Views read from it and call its methods.
pub struct Studio<S: Storage> {
    client: GeneratorClient,
    history: HistoryStore<S>,
    settings: GenerationSettings,
    status: GenerationStatus,
    current: Option<GeneratedImage>,
    error: Option<String>,
}

impl<S: Storage> Studio<S> {
    pub fn new(client: GeneratorClient, storage: S) -> Result<Self, StudioError> {
        Ok(Self {
            client,
            history: HistoryStore::load(storage)?,
            settings: GenerationSettings::default(),
            status: GenerationStatus::Idle,
            current: None,
            error: None,
        })
    }

    pub fn settings(&self) -> GenerationSettings {
        self.settings
    }

    pub fn set_style(&mut self, style: Style) {
        self.settings.style = style;
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.settings.dimensions = dimensions;
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn current(&self) -> Option<&GeneratedImage> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &[GeneratedImage] {
        self.history.images()
    }

    pub fn delete_image(&mut self, id: &str) -> Result<bool, StudioError> {
        Ok(self.history.delete(id)?)
    }

    pub fn clear_history(&mut self) -> Result<(), StudioError> {
        Ok(self.history.clear()?)
    }

    /// Saves the image behind `id` as `ai-image-<id>.jpg` inside `dir`.
    pub async fn download_image(&self, id: &str, dir: &Path) -> Result<PathBuf, StudioError> {
        let image = self
            .history
            .get(id)
            .ok_or_else(|| StudioError::UnknownImage(id.to_string()))?;

        let bytes = self
            .client
            .fetch_image(&image.url)
            .await
            .inspect_err(|err| error!(%id, %err, "download failed"))?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("ai-image-{id}.jpg"));
        tokio::fs::write(&path, bytes).await?;
        info!(%id, path = %path.display(), "image downloaded");
        Ok(path)
    }

    /// Runs one generation and records the result in history.
    ///
    /// A blank prompt is rejected before any request is made and leaves the
    /// status untouched.
    pub async fn generate(&mut self, prompt: &str) -> Result<GeneratedImage, StudioError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            self.error = Some(StudioError::EmptyPrompt.to_string());
            return Err(StudioError::EmptyPrompt);
        }

        self.status = GenerationStatus::Generating;
        self.error = None;
        self.current = None;

        match self.run(prompt).await {
            Ok(image) => {
                self.status = GenerationStatus::Success;
                self.current = Some(image.clone());
                Ok(image)
            }
            Err(err) => {
                error!(%err, "generation error");
                self.status = GenerationStatus::Error;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn run(&mut self, prompt: &str) -> Result<GeneratedImage, StudioError> {
        let GenerationSettings { dimensions, style } = self.settings;
        let request = GenerationRequest {
            prompt: Some(prompt.to_string()),
            width: Some(dimensions.width),
            height: Some(dimensions.height),
            style: Some(style.key().to_string()),
        };

        let response = self.client.generate(&request).await?;
        let (id, url) = match response {
            GenerationResponse {
                success: true,
                id: Some(id),
                image_url: Some(url),
                ..
            } => (id, url),
            GenerationResponse { error, .. } => {
                return Err(StudioError::Rejected(
                    error.unwrap_or_else(|| "Generation failed".to_string()),
                ));
            }
        };

        let image = GeneratedImage {
            id,
            url,
            prompt: prompt.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            dimensions: dimensions.to_string(),
            style: Some(style.key().to_string()),
        };
        info!(id = %image.id, "image added to history");
        self.history.add(image.clone())?;
        Ok(image)
    }
}
