// handler/messages.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{messagedb::MessageExt, profiledb::ProfileExt},
    dtos::messagedtos::*,
    error::HttpError,
    middleware::main_middleware::JWTAuthMiddeware,
    AppState,
};

const CONVERSATION_PAGE_SIZE: i64 = 100;

pub fn messages_handler() -> Router {
    Router::new()
        .route("/", post(send_message).get(get_inbox))
        .route("/conversation/:profile_id", get(get_conversation))
}

pub async fn get_inbox(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state
        .db_client
        .list_inbox(user.profile.id, CONVERSATION_PAGE_SIZE)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ConversationResponseDto {
        status: "success".to_string(),
        results: messages.len() as i64,
        messages: FilterMessageDto::filter_messages(&messages),
    };
    Ok(Json(response))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.recipient_id == user.profile.id {
        return Err(HttpError::bad_request("Cannot message yourself"));
    }

    app_state
        .db_client
        .get_profile(body.recipient_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Recipient not found"))?;

    let message = app_state
        .db_client
        .save_message(user.profile.id, body.recipient_id, body.text)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = MessageResponseDto {
        status: "success".to_string(),
        message: FilterMessageDto::filter_message(&message),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_conversation(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state
        .db_client
        .list_conversation(user.profile.id, profile_id, CONVERSATION_PAGE_SIZE)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ConversationResponseDto {
        status: "success".to_string(),
        results: messages.len() as i64,
        messages: FilterMessageDto::filter_messages(&messages),
    };
    Ok(Json(response))
}
