use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::model::GenerationResponse;
use crate::upstream::ExtractionError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Prompt is required and must be a non-empty string")]
    EmptyPrompt,
    #[error("Prompt must be less than 1000 characters")]
    PromptTooLong,
    #[error("AI service error: {0}")]
    UpstreamStatus(u16),
    #[error("{}", extraction_message(.0))]
    Extraction(#[from] ExtractionError),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    InvalidBody(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("Internal server error")]
    Internal,
}

fn extraction_message(err: &ExtractionError) -> &'static str {
    match err {
        ExtractionError::InvalidStructure => "Invalid response from AI service",
        ExtractionError::NoImageUrl => "Invalid response from AI service - no image URL found",
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::EmptyPrompt | ServiceError::PromptTooLong => StatusCode::BAD_REQUEST,
            ServiceError::UpstreamStatus(_)
            | ServiceError::Extraction(_)
            | ServiceError::Transport(_)
            | ServiceError::InvalidBody(_)
            | ServiceError::Config(_)
            | ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let message = if message.trim().is_empty() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        (status, axum::Json(GenerationResponse::failure(message))).into_response()
    }
}
