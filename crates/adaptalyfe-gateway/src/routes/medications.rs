//! Medication endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};

use adaptalyfe_core::store::Medication;

use crate::error::AppError;
use crate::json::{CreateMedicationRequest, DeletedResponse, UpdateMedicationRequest};
use crate::AppState;

/// Medication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/medications", get(list_medications).post(create_medication))
        .route(
            "/medications/:id",
            get(get_medication)
                .put(update_medication)
                .delete(delete_medication),
        )
}

async fn list_medications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Medication>>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.medications.list_for_user(&claims.sub)?))
}

async fn create_medication(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateMedicationRequest>,
) -> Result<Json<Medication>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("medication name is empty".to_string()));
    }

    let medication = state.store.medications.create(
        &claims.sub,
        request.name.trim(),
        &request.dosage,
        &request.schedule,
    )?;
    Ok(Json(medication))
}

async fn get_medication(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Medication>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let medication = state
        .store
        .medications
        .get(&claims.sub, &id)?
        .ok_or_else(|| AppError::NotFound("medication not found".to_string()))?;
    Ok(Json(medication))
}

async fn update_medication(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<UpdateMedicationRequest>,
) -> Result<Json<Medication>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let mut medication = state
        .store
        .medications
        .get(&claims.sub, &id)?
        .ok_or_else(|| AppError::NotFound("medication not found".to_string()))?;

    medication.name = request.name;
    medication.dosage = request.dosage;
    medication.schedule = request.schedule;
    medication.active = request.active;
    state.store.medications.update(&medication)?;

    Ok(Json(medication))
}

async fn delete_medication(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let deleted = state.store.medications.delete(&claims.sub, &id)?;
    Ok(Json(DeletedResponse { deleted }))
}
