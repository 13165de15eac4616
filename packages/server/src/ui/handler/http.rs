//! HTTP status endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::ChatStatusDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current capacity, active clients and history length
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ChatStatusDto> {
    let status = state.get_chat_status_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(status.into())
}
