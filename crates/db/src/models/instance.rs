//! Instance entity model and DTOs.
//!
//! Read models deliberately omit `api_key`: the secret never appears in a
//! column list that feeds a serialized response. Connectivity checks load
//! [`InstanceCredentials`] instead, which is not serializable.

use flowdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `instances` table as exposed to clients (no `api_key`).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: DbId,
    pub name: String,
    pub api_base_url: String,
    pub auth_type: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Owning-instance summary embedded in workflow and execution responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSummary {
    pub id: DbId,
    pub name: String,
    pub api_base_url: String,
}

/// Credentials for the outbound connectivity check. Intentionally not
/// `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct InstanceCredentials {
    pub id: DbId,
    pub api_base_url: String,
    pub api_key: String,
    pub auth_type: String,
}

/// DTO for registering a new instance.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstance {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(url(message = "apiBaseUrl must be a valid URL"))]
    pub api_base_url: String,
    #[validate(length(min = 1, message = "apiKey must not be empty"))]
    pub api_key: String,
    /// Defaults to `API_KEY` if omitted.
    pub auth_type: Option<String>,
}

/// DTO for updating an instance. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstance {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(url(message = "apiBaseUrl must be a valid URL"))]
    pub api_base_url: Option<String>,
    #[validate(length(min = 1, message = "apiKey must not be empty"))]
    pub api_key: Option<String>,
    pub auth_type: Option<String>,
    pub status: Option<String>,
}

/// Instance count per registration status, for the dashboard distribution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
