// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Please set the OPENAI_API_KEY environment variable")]
    MissingApiKey,
    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
    #[error("Assistant API request failed: {0}")]
    Transport(String),
    #[error("Assistant API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Failed to decode assistant API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::MissingApiKey | ChatError::InvalidConfig { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ChatError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Transport(_) | ChatError::Api { .. } | ChatError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %self, "chat request failed");
        } else {
            tracing::warn!(status = %status.as_u16(), error = %self, "chat request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
