use axum::{extract::Extension, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

pub fn status_routes() -> Router {
    Router::new().route("/api/status", get(api_status))
}

// API Status endpoint
pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let assistant_status = if state.chat.is_configured() { "configured" } else { "not_configured" };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "assistant_id": state.config.assistant_id,
        "mode": state.chat.mode().as_str(),
        "active_sessions": state.sessions.len().await,
        "services": {
            "assistant_api": assistant_status
        },
        "endpoints": {
            "chat_page": "/",
            "sessions": "/api/sessions",
            "status": "/api/status"
        }
    }))
}
