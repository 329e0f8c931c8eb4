use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::ChatMessage;
use crate::services::conversation::{self, ChatReply};
use crate::state::AppState;

const MAX_MESSAGE_LEN: usize = 2000;

pub async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../web/chat.html"))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

fn check_session_id(session_id: &str) -> Result<(), AppError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= 64
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AppError::BadRequest("invalid session_id".to_string()));
    }
    Ok(())
}

// POST /api/chat/message
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    check_session_id(&payload.session_id)?;

    let message = payload.message.trim();
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::BadRequest(format!(
            "message longer than {MAX_MESSAGE_LEN} characters"
        )));
    }

    let reply = conversation::process_message(&state, &payload.session_id, message).await?;
    Ok(Json(reply))
}

// GET /api/chat/:session_id/transcript
pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    check_session_id(&session_id)?;

    let messages = conversation::transcript(&state, &session_id).await?;
    Ok(Json(messages))
}

// DELETE /api/chat/:session_id
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_session_id(&session_id)?;

    conversation::reset_session(&state, &session_id)?;
    tracing::info!(session = %session_id, "chat session cleared");
    Ok(Json(serde_json::json!({ "success": true })))
}
