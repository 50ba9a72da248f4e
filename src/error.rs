use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("completion API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion response carried no message content")]
    EmptyContent,

    #[error("invalid JSON in model output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected model output: {0}")]
    Shape(String),
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image API returned status {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("could not create uploads directory: {0}")]
    UploadsDir(#[from] std::io::Error),
}

/// Failures that escape the per-slide fallbacks and abort a whole request.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("slide task failed: {0}")]
    SlideTask(#[from] tokio::task::JoinError),
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        tracing::error!("Presentation generation failed: {}", self);
        let body = json!({
            "error": "Failed to generate presentation",
            "message": "An unexpected error occurred while generating slides",
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
