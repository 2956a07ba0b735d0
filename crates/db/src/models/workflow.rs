//! Workflow entity model and DTOs.

use flowdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::execution::ExecutionSummary;
use crate::models::instance::InstanceSummary;

/// A row from the `workflows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: DbId,
    pub instance_id: DbId,
    pub external_workflow_id: String,
    pub name: String,
    pub active: bool,
    pub tags: Option<String>,
    pub project: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A workflow list entry with its owning instance and execution count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowListItem {
    pub id: DbId,
    pub instance_id: DbId,
    pub external_workflow_id: String,
    pub name: String,
    pub active: bool,
    pub tags: Option<String>,
    pub project: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub instance: InstanceSummary,
    pub execution_count: i64,
}

/// A single workflow with its instance and the most recent executions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDetail {
    pub id: DbId,
    pub instance_id: DbId,
    pub external_workflow_id: String,
    pub name: String,
    pub active: bool,
    pub tags: Option<String>,
    pub project: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub instance: InstanceSummary,
    pub recent_executions: Vec<ExecutionSummary>,
}

/// Workflow summary embedded in execution responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: DbId,
    pub name: String,
    pub external_workflow_id: String,
    pub instance: InstanceSummary,
}

/// Explicit filter set for workflow listings. Each present field maps to
/// one predicate.
#[derive(Debug, Clone, Default)]
pub struct WorkflowFilter {
    pub instance_id: Option<DbId>,
    pub active: Option<bool>,
    pub project: Option<String>,
}

/// DTO for mirroring a new workflow.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflow {
    pub instance_id: DbId,
    #[validate(length(min = 1, message = "externalWorkflowId must not be empty"))]
    pub external_workflow_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// Defaults to `false` if omitted.
    pub active: Option<bool>,
    pub tags: Option<String>,
    pub project: Option<String>,
}

/// DTO for updating a workflow. Identity fields (`instance_id`,
/// `external_workflow_id`) are immutable after creation and therefore
/// absent here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflow {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub active: Option<bool>,
    pub tags: Option<String>,
    pub project: Option<String>,
}
