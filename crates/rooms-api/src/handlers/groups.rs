//! Group handlers
//!
//! Endpoints for group lifecycle and membership operations.

use axum::{
    extract::{Path, State},
    Json,
};
use rooms_service::dto::{
    ApiResponse, CreateGroupRequest, DeletedResponse, GroupResponse, KickMemberRequest,
    UpdateGroupRequest,
};
use rooms_service::GroupService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// List all groups
///
/// GET /api/groups
pub async fn list_groups(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<GroupResponse>>>> {
    let service = GroupService::new(state.service_context());
    let groups = service.list_groups().await?;
    Ok(Json(ApiResponse::new(groups)))
}

/// Create a group
///
/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> ApiResult<Created<Json<ApiResponse<GroupResponse>>>> {
    let service = GroupService::new(state.service_context());
    let group = service.create_group(auth.user_id, request).await?;
    Ok(Created(Json(ApiResponse::new(group))))
}

/// Get a group by ID
///
/// GET /api/groups/{group_id}
pub async fn get_group(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(group_id): Path<String>,
) -> ApiResult<Json<ApiResponse<GroupResponse>>> {
    let group_id = parse_group_id(&group_id)?;

    let service = GroupService::new(state.service_context());
    let group = service.get_group(group_id).await?;
    Ok(Json(ApiResponse::new(group)))
}

/// Update a group
///
/// PATCH /api/groups/{group_id}
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateGroupRequest>,
) -> ApiResult<Json<ApiResponse<GroupResponse>>> {
    let group_id = parse_group_id(&group_id)?;

    let service = GroupService::new(state.service_context());
    let group = service.update_group(group_id, auth.user_id, request).await?;
    Ok(Json(ApiResponse::new(group)))
}

/// Delete a group and its history
///
/// DELETE /api/groups/{group_id}
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<String>,
) -> ApiResult<Json<ApiResponse<DeletedResponse>>> {
    let group_id = parse_group_id(&group_id)?;

    let service = GroupService::new(state.service_context());
    let deleted = service.delete_group(group_id, auth.user_id).await?;
    Ok(Json(ApiResponse::new(deleted)))
}

/// Join a group
///
/// POST /api/groups/{group_id}/join
pub async fn join_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<String>,
) -> ApiResult<Json<ApiResponse<GroupResponse>>> {
    let group_id = parse_group_id(&group_id)?;

    let service = GroupService::new(state.service_context());
    let group = service.join_group(group_id, auth.user_id).await?;
    Ok(Json(ApiResponse::new(group)))
}

/// Kick a member from a group
///
/// POST /api/groups/{group_id}/kick
pub async fn kick_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<String>,
    Json(request): Json<KickMemberRequest>,
) -> ApiResult<Json<ApiResponse<GroupResponse>>> {
    let group_id = parse_group_id(&group_id)?;
    let target_id = request
        .user_id
        .parse()
        .map_err(|_| ApiError::invalid_body("Invalid user_id format"))?;

    let service = GroupService::new(state.service_context());
    let group = service.kick_member(group_id, auth.user_id, target_id).await?;
    Ok(Json(ApiResponse::new(group)))
}

fn parse_group_id(raw: &str) -> Result<rooms_core::Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid group_id format"))
}
