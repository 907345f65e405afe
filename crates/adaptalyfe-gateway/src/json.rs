//! JSON request and response types for the gateway.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use adaptalyfe_core::acl::{AclRule, Visibility};
use adaptalyfe_core::store::{Frequency, Role, User};

// ---- auth ----

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Unique login name.
    pub username: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Name shown in the UI.
    pub display_name: String,
    /// Account role; defaults to an individual account.
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Individual
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A user without credential fields.
#[derive(Debug, Serialize)]
pub struct UserJson {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

impl From<User> for UserJson {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
        }
    }
}

/// Login/registration response: a session token plus the user.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserJson,
}

// ---- health ----

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Whether the store answered the probe.
    pub storage_ok: bool,
}

// ---- tasks ----

/// Task creation request.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub category: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub points: u32,
}

/// Task update request (full replace of the editable fields).
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub category: String,
    pub frequency: Frequency,
    pub points: u32,
}

// ---- bills ----

/// Bill creation request.
#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    pub name: String,
    /// Amount due, in cents.
    pub amount_cents: i64,
    /// Day of month the bill is due (1-31).
    pub due_day: u8,
}

/// Paid-flag update request.
#[derive(Debug, Deserialize)]
pub struct PayBillRequest {
    pub paid: bool,
}

// ---- medications ----

/// Medication creation request.
#[derive(Debug, Deserialize)]
pub struct CreateMedicationRequest {
    pub name: String,
    pub dosage: String,
    pub schedule: String,
}

/// Medication update request (full replace of the editable fields).
#[derive(Debug, Deserialize)]
pub struct UpdateMedicationRequest {
    pub name: String,
    pub dosage: String,
    pub schedule: String,
    pub active: bool,
}

// ---- symptoms ----

/// Symptom entry creation request.
#[derive(Debug, Deserialize)]
pub struct CreateSymptomRequest {
    /// Day the entry describes.
    pub recorded_on: NaiveDate,
    /// Severity on a 1-10 scale.
    pub severity: u8,
    #[serde(default)]
    pub notes: String,
}

// ---- care groups ----

/// Care group creation request.
#[derive(Debug, Deserialize)]
pub struct CreateCareGroupRequest {
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// Member addition request.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

// ---- objects ----

/// Upload allocation response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Signed URL the client PUTs the file to.
    pub upload_url: String,
    /// Client-facing `/objects/...` path of the allocated object.
    pub object_path: String,
}

/// Upload finalization request: attach the access policy once the file is
/// at its final location.
#[derive(Debug, Deserialize)]
pub struct FinalizeUploadRequest {
    /// The signed upload URL or the `/bucket/name` path of the object.
    pub object_url: String,
    /// Visibility of the finished object.
    pub visibility: Visibility,
    /// Group grants, evaluated in order.
    #[serde(default)]
    pub acl_rules: Vec<AclRule>,
    /// Content type to record for downloads.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Upload finalization response.
#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    /// Client-facing `/objects/...` path of the finished object.
    pub object_path: String,
}

// ---- chat ----

/// Assistant chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Assistant chat response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub reply: String,
    /// Whether the canned fallback answered instead of the live endpoint.
    pub fallback: bool,
}

// ---- shared ----

/// Deletion response.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    /// Whether anything was removed.
    pub deleted: bool,
}
