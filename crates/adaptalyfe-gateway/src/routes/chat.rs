//! Assistant chat endpoint.
//!
//! Forwards the user's message to the configured completion endpoint; any
//! failure (or no endpoint at all) answers with the canned fallback so the
//! feature degrades instead of erroring at the user.

use std::time::Duration;

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;
use crate::json::{ChatRequest, ChatResponse};
use crate::AppState;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(10);

const FALLBACK_REPLY: &str = "I'm here to help! I couldn't reach the assistant service just now, \
     but you can keep using your task list, bills, and medication reminders as usual. \
     If something feels urgent, please reach out to someone in your care group.";

/// Chat routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    reply: String,
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    state.sessions.authenticate(&headers)?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is empty".to_string()));
    }

    let Some(endpoint) = state.config.chat_endpoint.clone() else {
        return Ok(Json(ChatResponse {
            reply: FALLBACK_REPLY.to_string(),
            fallback: true,
        }));
    };

    match forward(&state.http, &endpoint, message).await {
        Ok(reply) => Ok(Json(ChatResponse {
            reply,
            fallback: false,
        })),
        Err(err) => {
            warn!(error = %err, "chat completion failed, serving fallback");
            Ok(Json(ChatResponse {
                reply: FALLBACK_REPLY.to_string(),
                fallback: true,
            }))
        }
    }
}

async fn forward(
    client: &reqwest::Client,
    endpoint: &str,
    message: &str,
) -> Result<String, String> {
    let response = client
        .post(endpoint)
        .timeout(COMPLETION_TIMEOUT)
        .json(&CompletionRequest { message })
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("completion endpoint returned {}", response.status()));
    }

    let body: CompletionResponse = response.json().await.map_err(|e| e.to_string())?;
    Ok(body.reply)
}
