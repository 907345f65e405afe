//! AdaptaLyfe HTTP/JSON Gateway.
//!
//! This crate provides the REST API for the AdaptaLyfe backend: session
//! auth, entity CRUD routes, policy-guarded object upload/download, and the
//! assistant chat endpoint.

pub mod config;
pub mod error;
pub mod json;
pub mod routes;
pub mod session;

pub use config::{Args, GatewayConfig};
pub use error::AppError;
pub use session::{SessionClaims, SessionManager};

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use adaptalyfe_core::acl::GroupRegistry;
use adaptalyfe_core::store::AppStore;
use adaptalyfe_objects::ObjectVault;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Application stores.
    pub store: AppStore,
    /// Object vault.
    pub vault: ObjectVault,
    /// ACL group registry, wired to the store's care groups.
    pub registry: GroupRegistry,
    /// Session token manager.
    pub sessions: SessionManager,
    /// Outbound HTTP client (assistant endpoint).
    pub http: reqwest::Client,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: AppStore, vault: ObjectVault, config: GatewayConfig) -> Self {
        let registry = store.group_registry();
        let sessions = SessionManager::new(&config.session_secret, config.session_ttl);

        Self {
            store,
            vault,
            registry,
            sessions,
            http: reqwest::Client::new(),
            config,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::auth::routes())
        .merge(routes::tasks::routes())
        .merge(routes::bills::routes())
        .merge(routes::medications::routes())
        .merge(routes::symptoms::routes())
        .merge(routes::care_groups::routes())
        .merge(routes::objects::routes())
        .merge(routes::chat::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
