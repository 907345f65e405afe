//! Bill endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use adaptalyfe_core::store::Bill;

use crate::error::AppError;
use crate::json::{CreateBillRequest, DeletedResponse, PayBillRequest};
use crate::AppState;

/// Bill routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bills", get(list_bills).post(create_bill))
        .route("/bills/:id", get(get_bill).delete(delete_bill))
        .route("/bills/:id/pay", post(pay_bill))
}

async fn list_bills(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Bill>>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.bills.list_for_user(&claims.sub)?))
}

async fn create_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBillRequest>,
) -> Result<Json<Bill>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("bill name is empty".to_string()));
    }

    let bill = state.store.bills.create(
        &claims.sub,
        request.name.trim(),
        request.amount_cents,
        request.due_day,
    )?;
    Ok(Json(bill))
}

async fn get_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bill>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let bill = state
        .store
        .bills
        .get(&claims.sub, &id)?
        .ok_or_else(|| AppError::NotFound("bill not found".to_string()))?;
    Ok(Json(bill))
}

async fn pay_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<PayBillRequest>,
) -> Result<Json<Bill>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    Ok(Json(state.store.bills.set_paid(
        &claims.sub,
        &id,
        request.paid,
    )?))
}

async fn delete_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let deleted = state.store.bills.delete(&claims.sub, &id)?;
    Ok(Json(DeletedResponse { deleted }))
}
