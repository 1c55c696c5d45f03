// src/handlers/chat.rs
use crate::chart::{self, MessageChart};
use crate::conversation::TurnResult;
use crate::error::ChatError;
use crate::export::{ConversationExport, EXPORT_FILE_NAME};
use crate::types::Message;
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub session_id: Uuid,
    pub charts: Vec<MessageChart>,
}

pub fn chat_routes() -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:session_id/messages", get(get_messages).post(send_message))
        .route("/api/sessions/:session_id/charts", get(get_charts))
        .route("/api/sessions/:session_id/export", get(export_conversation))
}

/// POST /api/sessions - Start a new chat session
pub async fn create_session(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/sessions/:session_id/messages - Ordered conversation history
pub async fn get_messages(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<MessagesResponse>, ChatError> {
    let session = state.sessions.get(session_id).await?;
    let messages = session.snapshot().await;
    Ok(Json(MessagesResponse { session_id, messages }))
}

/// POST /api/sessions/:session_id/messages - Send one user turn and wait for the reply
pub async fn send_message(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<TurnResult>, ChatError> {
    let session = state.sessions.get(session_id).await?;
    let turn = state.chat.submit(&session, &request.content).await?;
    tracing::info!(session_id = %session_id, outcome = turn.outcome, "assistant replied");
    Ok(Json(turn))
}

/// GET /api/sessions/:session_id/charts - Charts for every assistant reply that has one
pub async fn get_charts(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ChartsResponse>, ChatError> {
    let session = state.sessions.get(session_id).await?;
    let charts = chart::charts(&session.snapshot().await);
    Ok(Json(ChartsResponse { session_id, charts }))
}

/// GET /api/sessions/:session_id/export - Download the conversation as JSON
pub async fn export_conversation(
    Path(session_id): Path<Uuid>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, ChatError> {
    let session = state.sessions.get(session_id).await?;
    let export = ConversationExport::new(&state.config.assistant_id, &session.snapshot().await);
    let bytes = export.to_json_bytes()?;

    tracing::info!(session_id = %session_id, messages = export.messages.len(), "exported conversation");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}
