use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

use super::AppState;
use crate::error::Result;
use crate::models::{Conversation, CreateConversationRequest, MessageRole, PostMessageRequest};

pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateConversationRequest>,
) -> Result<Json<Conversation>> {
    let conversation = state
        .service
        .create_conversation(body.messages, body.preferences)
        .await?;
    Ok(Json(conversation))
}

pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Conversation>> {
    let conversation = state.service.get_conversation(id).await?;
    Ok(Json(conversation))
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<PostMessageRequest>,
) -> Result<Json<Conversation>> {
    state.service.ensure_provider_configured()?;

    // System-originated messages (the generated welcome posted back by the
    // client) are stored tagged and never trigger a responder turn.
    let role = if body.is_system_message {
        MessageRole::SystemWelcome
    } else {
        MessageRole::User
    };

    let conversation = state.service.post_message(id, body.content, role).await?;
    Ok(Json(conversation))
}

pub async fn request_recommendations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Conversation>> {
    let conversation = state.service.request_recommendations(id).await?;
    Ok(Json(conversation))
}
