//! Handlers for the `/workflows` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use flowdeck_core::error::CoreError;
use flowdeck_core::types::DbId;
use flowdeck_db::models::workflow::{
    CreateWorkflow, UpdateWorkflow, Workflow, WorkflowDetail, WorkflowFilter, WorkflowListItem,
};
use flowdeck_db::repositories::{InstanceRepo, WorkflowRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::export::{csv_field, csv_response, ExportFormat};
use crate::response::{ApiResponse, MessageData};
use crate::state::AppState;

/// Query params for `GET /api/workflows`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowListParams {
    pub instance_id: Option<DbId>,
    pub active: Option<bool>,
    pub project: Option<String>,
}

impl WorkflowListParams {
    fn into_filter(self) -> WorkflowFilter {
        WorkflowFilter {
            instance_id: self.instance_id,
            active: self.active,
            project: self.project,
        }
    }
}

/// GET /api/workflows
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<WorkflowListParams>,
) -> AppResult<Json<ApiResponse<Vec<WorkflowListItem>>>> {
    let workflows = WorkflowRepo::list(&state.pool, &params.into_filter()).await?;
    Ok(Json(ApiResponse::new(workflows)))
}

/// POST /api/workflows
///
/// The referenced instance must exist (404 otherwise) and must not already
/// mirror the same external workflow id (400 otherwise).
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflow>,
) -> AppResult<(StatusCode, Json<ApiResponse<Workflow>>)> {
    input.validate()?;

    if InstanceRepo::find_by_id(&state.pool, input.instance_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id: input.instance_id,
        }));
    }

    if WorkflowRepo::exists_for_instance(
        &state.pool,
        input.instance_id,
        &input.external_workflow_id,
    )
    .await?
    {
        return Err(AppError::Core(CoreError::Conflict(
            "This instance already mirrors that workflow id".to_string(),
        )));
    }

    let workflow = WorkflowRepo::create(&state.pool, &input).await?;
    tracing::info!(
        workflow_id = workflow.id,
        instance_id = workflow.instance_id,
        "Workflow mirrored"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::new(workflow))))
}

/// GET /api/workflows/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<WorkflowDetail>>> {
    let detail = WorkflowRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }))?;
    Ok(Json(ApiResponse::new(detail)))
}

/// PUT /api/workflows/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkflow>,
) -> AppResult<Json<ApiResponse<Workflow>>> {
    input.validate()?;
    let workflow = WorkflowRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }))?;
    Ok(Json(ApiResponse::new(workflow)))
}

/// DELETE /api/workflows/{id}
///
/// Executions under the workflow are removed by the declared cascade.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<MessageData>>> {
    let deleted = WorkflowRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }));
    }
    tracing::info!(workflow_id = id, "Workflow deleted");
    Ok(Json(ApiResponse::new(MessageData {
        message: "Workflow deleted",
    })))
}

/// Query params for `GET /api/workflows/export`: format plus the list
/// filters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExportParams {
    pub format: Option<String>,
    pub instance_id: Option<DbId>,
    pub active: Option<bool>,
    pub project: Option<String>,
}

/// GET /api/workflows/export?format=json|csv
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<WorkflowExportParams>,
) -> AppResult<axum::response::Response> {
    let format = ExportFormat::from_param(params.format.as_deref())?;
    let filter = WorkflowFilter {
        instance_id: params.instance_id,
        active: params.active,
        project: params.project,
    };
    let workflows = WorkflowRepo::list(&state.pool, &filter).await?;

    match format {
        ExportFormat::Csv => {
            let mut csv = String::from(
                "id,instance_id,instance_name,external_workflow_id,name,active,tags,project,created_at,updated_at\n",
            );
            for workflow in &workflows {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{},{}\n",
                    workflow.id,
                    workflow.instance_id,
                    csv_field(&workflow.instance.name),
                    csv_field(&workflow.external_workflow_id),
                    csv_field(&workflow.name),
                    workflow.active,
                    csv_field(workflow.tags.as_deref().unwrap_or("")),
                    csv_field(workflow.project.as_deref().unwrap_or("")),
                    workflow.created_at.to_rfc3339(),
                    workflow.updated_at.to_rfc3339(),
                ));
            }
            Ok(csv_response("workflows.csv", csv))
        }
        ExportFormat::Json => Ok(Json(ApiResponse::new(workflows)).into_response()),
    }
}
