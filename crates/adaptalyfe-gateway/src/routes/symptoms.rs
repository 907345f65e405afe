//! Symptom journal endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};

use adaptalyfe_core::store::SymptomEntry;

use crate::error::AppError;
use crate::json::{CreateSymptomRequest, DeletedResponse};
use crate::AppState;

/// Symptom routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/symptoms", get(list_symptoms).post(create_symptom))
        .route("/symptoms/:id", get(get_symptom).delete(delete_symptom))
}

async fn list_symptoms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SymptomEntry>>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.symptoms.list_for_user(&claims.sub)?))
}

async fn create_symptom(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSymptomRequest>,
) -> Result<Json<SymptomEntry>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let entry = state.store.symptoms.create(
        &claims.sub,
        request.recorded_on,
        request.severity,
        &request.notes,
    )?;
    Ok(Json(entry))
}

async fn get_symptom(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SymptomEntry>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let entry = state
        .store
        .symptoms
        .get(&claims.sub, &id)?
        .ok_or_else(|| AppError::NotFound("symptom entry not found".to_string()))?;
    Ok(Json(entry))
}

async fn delete_symptom(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let deleted = state.store.symptoms.delete(&claims.sub, &id)?;
    Ok(Json(DeletedResponse { deleted }))
}
