//! Message handlers
//!
//! Endpoints for message history, posting, reactions, and deletion.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rooms_service::dto::{
    ApiResponse, CreateMessageRequest, DeletedResponse, ListMessagesQuery, MessageResponse,
    ToggleReactionRequest,
};
use rooms_service::MessageService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// List a group's message history
///
/// GET /api/groups/{group_id}/messages?since=...
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<MessageResponse>>>> {
    let group_id = group_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid group_id format"))?;

    let service = MessageService::new(state.service_context());
    let messages = service
        .list_messages(group_id, auth.user_id, query.since)
        .await?;
    Ok(Json(ApiResponse::new(messages)))
}

/// Post a message to a group
///
/// POST /api/groups/{group_id}/messages
pub async fn post_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<ApiResponse<MessageResponse>>>> {
    let group_id = group_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid group_id format"))?;

    let service = MessageService::new(state.service_context());
    let message = service.post_message(group_id, auth.user_id, request).await?;
    Ok(Created(Json(ApiResponse::new(message))))
}

/// Toggle a reaction on a message
///
/// POST /api/messages/{message_id}/reactions
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
    Json(request): Json<ToggleReactionRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let message_id = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    let message = service.react(message_id, auth.user_id, request.kind).await?;
    Ok(Json(ApiResponse::new(message)))
}

/// Delete a message
///
/// DELETE /api/messages/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> ApiResult<Json<ApiResponse<DeletedResponse>>> {
    let message_id = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    let deleted = service.delete_message(message_id, auth.user_id).await?;
    Ok(Json(ApiResponse::new(deleted)))
}
