//! Registration, login, and session introspection.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use crate::error::AppError;
use crate::json::{LoginRequest, RegisterRequest, SessionResponse, UserJson};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

/// Create an account and open a session.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("username is empty".to_string()));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = state.store.users.create(
        username,
        &request.password,
        request.display_name.trim(),
        request.role,
    )?;
    let token = state.sessions.issue(&user.id)?;

    Ok(Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

/// Check credentials and open a session.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state
        .store
        .users
        .verify_password(&request.username, &request.password)?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    let token = state.sessions.issue(&user.id)?;

    Ok(Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

/// The current session's user.
async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<UserJson>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;
    let user = state
        .store
        .users
        .get(&claims.sub)?
        .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

    Ok(Json(user.into()))
}
