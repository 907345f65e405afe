//! Daily task endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use adaptalyfe_core::store::DailyTask;

use crate::error::AppError;
use crate::json::{CreateTaskRequest, DeletedResponse, UpdateTaskRequest};
use crate::AppState;

/// Task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/toggle", post(toggle_task))
}

async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DailyTask>>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.tasks.list_for_user(&claims.sub)?))
}

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<DailyTask>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    if request.title.trim().is_empty() {
        return Err(AppError::BadRequest("task title is empty".to_string()));
    }

    let task = state.store.tasks.create(
        &claims.sub,
        request.title.trim(),
        &request.category,
        request.frequency,
        request.points,
    )?;
    Ok(Json(task))
}

async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DailyTask>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let task = state
        .store
        .tasks
        .get(&claims.sub, &id)?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;
    Ok(Json(task))
}

async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<DailyTask>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let mut task = state
        .store
        .tasks
        .get(&claims.sub, &id)?
        .ok_or_else(|| AppError::NotFound("task not found".to_string()))?;

    task.title = request.title;
    task.category = request.category;
    task.frequency = request.frequency;
    task.points = request.points;
    state.store.tasks.update(&task)?;

    Ok(Json(task))
}

async fn toggle_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DailyTask>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.tasks.toggle_completed(&claims.sub, &id)?))
}

async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let deleted = state.store.tasks.delete(&claims.sub, &id)?;
    Ok(Json(DeletedResponse { deleted }))
}
