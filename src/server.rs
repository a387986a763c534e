use std::{any::Any, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    config::AppConfig,
    error::ServiceError,
    model::{GenerationRequest, GenerationResponse, MAX_PROMPT_CHARS, generation_id},
    upstream::{ImageBackend, extract_image_url},
};

const INDEX_HTML: &str = include_str!("ui/index.html");

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn ImageBackend>,
}

pub fn build_router(config: Arc<AppConfig>, backend: Arc<dyn ImageBackend>) -> Router {
    let state = AppState { config, backend };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_envelope))
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

fn panic_envelope(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("generation handler panicked");
    ServiceError::Internal.into_response()
}

async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerationResponse>, ServiceError> {
    let request: GenerationRequest = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::InvalidBody(e.to_string()))?;
    let prompt = validate_prompt(request.prompt.as_deref())?;

    let id = generation_id();
    let enhanced = state.config.styles.enhance(prompt, request.style.as_deref());
    info!(
        %id,
        width = ?request.width,
        height = ?request.height,
        enhanced_prompt = %enhanced,
        "generating image"
    );

    let reply = state.backend.request_image(&enhanced).await?;
    if !reply.is_success() {
        return Err(ServiceError::UpstreamStatus(reply.status));
    }
    let body = reply.body.ok_or(ServiceError::Internal)?;

    let image_url = extract_image_url(&body).inspect_err(|err| {
        error!(%id, %err, %body, "unexpected AI API response");
    })?;
    info!(%id, %image_url, "generated image");

    Ok(Json(GenerationResponse::success(image_url, id)))
}

/// Returns the prompt unchanged when it passes both checks.
fn validate_prompt(prompt: Option<&str>) -> Result<&str, ServiceError> {
    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or(ServiceError::EmptyPrompt)?;
    if prompt.encode_utf16().count() > MAX_PROMPT_CHARS {
        return Err(ServiceError::PromptTooLong);
    }
    Ok(prompt)
}
