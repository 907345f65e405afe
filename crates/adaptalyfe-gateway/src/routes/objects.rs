//! Object upload and download endpoints.
//!
//! Uploads happen directly against signed URLs: the client asks for an
//! upload destination, PUTs the file there, then finalizes by attaching
//! the access policy. Downloads run the policy check before streaming.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};

use adaptalyfe_core::acl::{AclPolicy, Permission};
use adaptalyfe_objects::Download;

use crate::error::AppError;
use crate::json::{FinalizeResponse, FinalizeUploadRequest, UploadResponse};
use crate::AppState;

/// Object routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/objects/upload", post(create_upload))
        .route("/objects/acl", put(finalize_upload))
        .route("/objects/*path", get(download_object))
        .route("/public-objects/*path", get(download_public))
}

/// Allocate an upload destination and sign a PUT URL for it.
async fn create_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UploadResponse>, AppError> {
    state.sessions.authenticate(&headers)?;

    let ticket = state.vault.create_upload().await?;
    Ok(Json(UploadResponse {
        upload_url: ticket.upload_url,
        object_path: ticket.entity_path,
    }))
}

/// Attach the access policy once the file is at its final location.
///
/// The session user becomes the owner. Replacing an existing policy is
/// allowed only for its recorded owner.
async fn finalize_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<FinalizeUploadRequest>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let claims = state.sessions.authenticate(&headers)?;

    let entity_path = state
        .vault
        .config()
        .entity_path(&request.object_url)
        .ok_or_else(|| {
            AppError::BadRequest("object url is outside the private object directory".to_string())
        })?;
    let object_path = state.vault.config().resolve_entity_path(&entity_path)?;

    if let Some(existing) = state.vault.get_policy(&object_path).await? {
        if existing.owner != claims.sub {
            return Err(AppError::Forbidden(
                "only the owner may replace an object's policy".to_string(),
            ));
        }
    }

    let mut policy = AclPolicy::new(claims.sub, request.visibility);
    policy.acl_rules = request.acl_rules;
    state.vault.set_policy(&object_path, &policy).await?;

    if let Some(content_type) = &request.content_type {
        state
            .vault
            .set_content_type(&object_path, content_type)
            .await?;
    }

    Ok(Json(FinalizeResponse {
        object_path: entity_path,
    }))
}

/// Stream a private entity object after the policy check.
async fn download_object(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let requester = state
        .sessions
        .authenticate_opt(&headers)
        .map(|claims| claims.sub);

    let entity_path = format!("/objects/{}", path);
    let object_path = state.vault.config().resolve_entity_path(&entity_path)?;

    let allowed = state
        .vault
        .can_access(
            &object_path,
            requester.as_deref(),
            Permission::Read,
            &state.registry,
        )
        .await?;
    if !allowed {
        return Err(AppError::Unauthorized("access denied".to_string()));
    }

    let download = state.vault.download(&object_path).await?;
    stream_response(download)
}

/// Stream a public asset found on the configured search paths. No auth.
async fn download_public(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let found = state
        .vault
        .find_public(&path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("public object not found: {}", path)))?;

    let download = state.vault.download(&found).await?;
    stream_response(download)
}

fn stream_response(download: Download) -> Result<Response, AppError> {
    Response::builder()
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_LENGTH, download.content_length)
        .header(header::CACHE_CONTROL, download.cache_control)
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::Internal(e.to_string()))
}
