//! Execution entity model and DTOs.

use flowdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::workflow::WorkflowSummary;

/// A row from the `executions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: DbId,
    pub execution_id: String,
    pub workflow_id: DbId,
    pub status: String,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Trimmed execution row embedded in workflow detail responses.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    pub id: DbId,
    pub execution_id: String,
    pub status: String,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
    pub created_at: Timestamp,
}

/// An execution joined with its workflow and that workflow's instance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionWithContext {
    pub id: DbId,
    pub execution_id: String,
    pub workflow_id: DbId,
    pub status: String,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub workflow: WorkflowSummary,
}

/// One page of execution rows plus the unpaginated match count.
#[derive(Debug)]
pub struct ExecutionPage {
    pub items: Vec<ExecutionWithContext>,
    pub total: i64,
}

/// Explicit filter set for execution listings. `instance_id` filters
/// through the owning workflow; the date range is inclusive on
/// `started_at`.
#[derive(Debug, Clone, Default)]
pub struct ExecutionFilter {
    pub workflow_id: Option<DbId>,
    pub instance_id: Option<DbId>,
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// DTO for recording a mirrored execution.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExecution {
    #[validate(length(min = 1, message = "executionId must not be empty"))]
    pub execution_id: String,
    pub workflow_id: DbId,
    pub status: String,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}
