//! Care group endpoints.
//!
//! Care groups are the membership lists behind `USER_LIST` object grants;
//! only the owner may change who is in one.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use adaptalyfe_core::store::CareGroup;

use crate::error::AppError;
use crate::json::{AddMemberRequest, CreateCareGroupRequest};
use crate::AppState;

/// Care group routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/care-groups", get(list_groups).post(create_group))
        .route("/care-groups/:id/members", post(add_member))
}

async fn list_groups(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CareGroup>>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.care_groups.list_for_owner(&claims.sub)?))
}

async fn create_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCareGroupRequest>,
) -> Result<Json<CareGroup>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("group name is empty".to_string()));
    }

    let group = state.store.care_groups.create(
        &claims.sub,
        request.name.trim(),
        request.member_ids,
    )?;
    Ok(Json(group))
}

async fn add_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<CareGroup>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;

    let group = state
        .store
        .care_groups
        .get(&id)?
        .ok_or_else(|| AppError::NotFound("care group not found".to_string()))?;
    if group.owner_id != claims.sub {
        return Err(AppError::Forbidden(
            "only the group owner may add members".to_string(),
        ));
    }

    Ok(Json(state.store.care_groups.add_member(&id, &request.user_id)?))
}
