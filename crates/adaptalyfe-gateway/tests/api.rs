//! End-to-end route tests against in-memory backends.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use serde_json::{json, Value};

use adaptalyfe_core::store::AppStore;
use adaptalyfe_gateway::{create_router, AppState, GatewayConfig};
use adaptalyfe_objects::{ObjectVault, ParsedPath, StaticSigner, VaultConfig};

struct TestApp {
    server: TestServer,
    vault: ObjectVault,
}

fn test_app() -> TestApp {
    let store = AppStore::temporary().unwrap();

    let backend: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
    let signer = Arc::new(StaticSigner::new("http://signer.test"));
    let vault_config = VaultConfig::new("/vault/private")
        .with_public_search_paths(vec!["/vault/public".to_string()]);
    let vault = ObjectVault::new(backend, signer, vault_config);

    let config = GatewayConfig {
        session_secret: "test-secret".to_string(),
        ..Default::default()
    };

    let state = AppState::new(store, vault.clone(), config);
    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        vault,
    }
}

fn auth_value(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Register a user; returns (token, user id).
async fn register(server: &TestServer, username: &str) -> (String, String) {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "username": username,
            "password": "a-long-password",
            "display_name": username,
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage_ok"], true);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = test_app();
    let (token, user_id) = register(&app.server, "alex").await;

    // The session works immediately.
    let response = app
        .server
        .get("/auth/me")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["username"], "alex");
    // Credential fields never leave the server.
    assert!(body.get("password_hash").is_none());

    // Fresh login works too.
    let response = app
        .server
        .post("/auth/login")
        .json(&json!({"username": "alex", "password": "a-long-password"}))
        .await;
    response.assert_status_ok();

    // Wrong password is rejected.
    let response = app
        .server
        .post("/auth/login")
        .json(&json!({"username": "alex", "password": "wrong"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation() {
    let app = test_app();

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({"username": "alex", "password": "short", "display_name": "Alex"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    register(&app.server, "alex").await;
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "username": "alex",
            "password": "a-long-password",
            "display_name": "Other Alex",
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_routes_require_session() {
    let app = test_app();

    for path in ["/tasks", "/bills", "/medications", "/symptoms", "/care-groups"] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_task_crud_and_toggle() {
    let app = test_app();
    let (token, _) = register(&app.server, "alex").await;

    let response = app
        .server
        .post("/tasks")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({
            "title": "Brush teeth",
            "category": "morning",
            "frequency": "daily",
            "points": 5,
        }))
        .await;
    response.assert_status_ok();
    let task: Value = response.json();
    let task_id = task["id"].as_str().unwrap();
    assert_eq!(task["completed"], false);

    let response = app
        .server
        .post(&format!("/tasks/{}/toggle", task_id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;
    response.assert_status_ok();
    let toggled: Value = response.json();
    assert_eq!(toggled["completed"], true);

    let response = app
        .server
        .get("/tasks")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;
    let tasks: Value = response.json();
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let response = app
        .server
        .delete(&format!("/tasks/{}", task_id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["deleted"], true);
}

#[tokio::test]
async fn test_tasks_are_per_user() {
    let app = test_app();
    let (token_a, _) = register(&app.server, "alex").await;
    let (token_b, _) = register(&app.server, "blake").await;

    app.server
        .post("/tasks")
        .add_header(header::AUTHORIZATION, auth_value(&token_a))
        .json(&json!({
            "title": "Brush teeth",
            "category": "morning",
            "frequency": "daily",
        }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/tasks")
        .add_header(header::AUTHORIZATION, auth_value(&token_b))
        .await;
    let tasks: Value = response.json();
    assert!(tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bill_pay_flow() {
    let app = test_app();
    let (token, _) = register(&app.server, "alex").await;

    let response = app
        .server
        .post("/bills")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"name": "Rent", "amount_cents": 85000, "due_day": 1}))
        .await;
    response.assert_status_ok();
    let bill: Value = response.json();
    let bill_id = bill["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/bills/{}/pay", bill_id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"paid": true}))
        .await;
    response.assert_status_ok();
    let paid: Value = response.json();
    assert_eq!(paid["paid"], true);

    // Invalid due day surfaces as a 400.
    let response = app
        .server
        .post("/bills")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"name": "Phone", "amount_cents": 4500, "due_day": 45}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Simulate a browser upload: ask for a destination, write the content
/// where the signed URL points, then finalize with a policy.
async fn upload_object(
    app: &TestApp,
    token: &str,
    content: &'static [u8],
    finalize: Value,
) -> (String, Value) {
    let response = app
        .server
        .post("/objects/upload")
        .add_header(header::AUTHORIZATION, auth_value(token))
        .await;
    response.assert_status_ok();
    let ticket: Value = response.json();
    let upload_url = ticket["upload_url"].as_str().unwrap().to_string();

    // The StaticSigner returns `http://signer.test/<bucket>/<name>`.
    let raw_path = upload_url.strip_prefix("http://signer.test").unwrap();
    app.vault
        .put(
            &ParsedPath::parse(raw_path).unwrap(),
            Bytes::from_static(content),
        )
        .await
        .unwrap();

    let mut body = finalize;
    body["object_url"] = json!(upload_url);
    let response = app
        .server
        .put("/objects/acl")
        .add_header(header::AUTHORIZATION, auth_value(token))
        .json(&body)
        .await;
    response.assert_status_ok();
    let finalized: Value = response.json();
    let object_path = finalized["object_path"].as_str().unwrap().to_string();
    (object_path, ticket)
}

#[tokio::test]
async fn test_private_object_owner_only() {
    let app = test_app();
    let (token_a, _) = register(&app.server, "alex").await;
    let (token_b, _) = register(&app.server, "blake").await;

    let (object_path, _) = upload_object(
        &app,
        &token_a,
        b"care plan",
        json!({"visibility": "private", "content_type": "text/plain"}),
    )
    .await;
    assert!(object_path.starts_with("/objects/uploads/"));

    // Owner reads it back.
    let response = app
        .server
        .get(&object_path)
        .add_header(header::AUTHORIZATION, auth_value(&token_a))
        .await;
    response.assert_status_ok();
    assert_eq!(response.text(), "care plan");
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap(),
        "text/plain"
    );
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .unwrap()
            .to_str()
            .unwrap(),
        "private, max-age=3600"
    );

    // Anonymous and other users are denied.
    app.server
        .get(&object_path)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get(&object_path)
        .add_header(header::AUTHORIZATION, auth_value(&token_b))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_object_readable_by_anyone() {
    let app = test_app();
    let (token, _) = register(&app.server, "alex").await;

    let (object_path, _) =
        upload_object(&app, &token, b"newsletter", json!({"visibility": "public"})).await;

    let response = app.server.get(&object_path).await;
    response.assert_status_ok();
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .unwrap()
            .to_str()
            .unwrap(),
        "public, max-age=3600"
    );
}

#[tokio::test]
async fn test_care_group_share_grants_read() {
    let app = test_app();
    let (token_a, _) = register(&app.server, "alex").await;
    let (token_b, user_b) = register(&app.server, "blake").await;

    // Alex puts Blake on their care team.
    let response = app
        .server
        .post("/care-groups")
        .add_header(header::AUTHORIZATION, auth_value(&token_a))
        .json(&json!({"name": "Support team", "member_ids": [user_b]}))
        .await;
    response.assert_status_ok();
    let group: Value = response.json();
    let group_id = group["id"].as_str().unwrap();

    let (object_path, _) = upload_object(
        &app,
        &token_a,
        b"medication history",
        json!({
            "visibility": "private",
            "acl_rules": [
                {"group": {"type": "USER_LIST", "id": group_id}, "permission": "read"}
            ],
        }),
    )
    .await;

    // The care-team member can read it.
    app.server
        .get(&object_path)
        .add_header(header::AUTHORIZATION, auth_value(&token_b))
        .await
        .assert_status_ok();

    // A stranger still cannot.
    let (token_c, _) = register(&app.server, "casey").await;
    app.server
        .get(&object_path)
        .add_header(header::AUTHORIZATION, auth_value(&token_c))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_group_kind_fails_loudly() {
    let app = test_app();
    let (token_a, _) = register(&app.server, "alex").await;
    let (token_b, _) = register(&app.server, "blake").await;

    let (object_path, _) = upload_object(
        &app,
        &token_a,
        b"notes",
        json!({
            "visibility": "private",
            "acl_rules": [
                {"group": {"type": "EMAIL_DOMAIN", "id": "example.com"}, "permission": "read"}
            ],
        }),
    )
    .await;

    // The owner never reaches rule evaluation.
    app.server
        .get(&object_path)
        .add_header(header::AUTHORIZATION, auth_value(&token_a))
        .await
        .assert_status_ok();

    // Anyone else trips the unresolvable rule: a 500, not a quiet denial.
    app.server
        .get(&object_path)
        .add_header(header::AUTHORIZATION, auth_value(&token_b))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_policy_replace_is_owner_only() {
    let app = test_app();
    let (token_a, _) = register(&app.server, "alex").await;
    let (token_b, _) = register(&app.server, "blake").await;

    let (object_path, ticket) = upload_object(
        &app,
        &token_a,
        b"journal",
        json!({"visibility": "private"}),
    )
    .await;

    // Someone else cannot take the object over.
    let response = app
        .server
        .put("/objects/acl")
        .add_header(header::AUTHORIZATION, auth_value(&token_b))
        .json(&json!({
            "object_url": ticket["upload_url"],
            "visibility": "public",
        }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    // The owner can republish it wholesale.
    let response = app
        .server
        .put("/objects/acl")
        .add_header(header::AUTHORIZATION, auth_value(&token_a))
        .json(&json!({
            "object_url": ticket["upload_url"],
            "visibility": "public",
        }))
        .await;
    response.assert_status_ok();

    app.server.get(&object_path).await.assert_status_ok();
}

#[tokio::test]
async fn test_finalize_missing_object() {
    let app = test_app();
    let (token, _) = register(&app.server, "alex").await;

    // Nothing was ever uploaded to this path.
    let response = app
        .server
        .put("/objects/acl")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({
            "object_url": "/vault/private/uploads/never-uploaded",
            "visibility": "private",
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_rejects_traversal() {
    let app = test_app();
    let (token, _) = register(&app.server, "alex").await;

    let response = app
        .server
        .get("/objects/uploads/../../etc/passwd")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_assets_route() {
    let app = test_app();

    app.vault
        .put(
            &ParsedPath::parse("/vault/public/welcome.txt").unwrap(),
            Bytes::from_static(b"welcome"),
        )
        .await
        .unwrap();

    let response = app.server.get("/public-objects/welcome.txt").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "welcome");

    app.server
        .get("/public-objects/missing.txt")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_fallback_without_endpoint() {
    let app = test_app();
    let (token, _) = register(&app.server, "alex").await;

    let response = app
        .server
        .post("/chat")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"message": "What should I do today?"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["fallback"], true);
    assert!(!body["reply"].as_str().unwrap().is_empty());

    // Empty messages are rejected rather than forwarded.
    let response = app
        .server
        .post("/chat")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"message": "   "}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
