//! Handlers for the `/executions` resource.
//!
//! Listing is paginated and filterable; the same filter set drives the
//! bulk delete and the export. The canonical filter semantics:
//! `workflowId` matches the local workflow row id, `instanceId` filters
//! through the owning workflow, and the date range is inclusive on
//! `startedAt`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use flowdeck_core::error::CoreError;
use flowdeck_core::status::ExecutionStatus;
use flowdeck_core::types::DbId;
use flowdeck_db::models::execution::{
    CreateExecution, Execution, ExecutionFilter, ExecutionWithContext,
};
use flowdeck_db::repositories::{ExecutionRepo, WorkflowRepo};
use flowdeck_db::{clamp_limit, clamp_page};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::export::{csv_field, csv_response, ExportFormat};
use crate::query::parse_date_param;
use crate::response::{ApiResponse, MessageData, Paginated, Pagination};
use crate::state::AppState;

/// Query params shared by list, bulk delete, and export.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub workflow_id: Option<DbId>,
    pub instance_id: Option<DbId>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>,
}

impl ExecutionQueryParams {
    /// Convert the raw params into a typed filter, validating the status
    /// vocabulary and date formats.
    fn to_filter(&self) -> AppResult<ExecutionFilter> {
        if let Some(ref status) = self.status {
            ExecutionStatus::parse(status).map_err(AppError::Core)?;
        }

        let start_date = self
            .start_date
            .as_deref()
            .map(|s| parse_date_param(s, false))
            .transpose()?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|s| parse_date_param(s, true))
            .transpose()?;

        Ok(ExecutionFilter {
            workflow_id: self.workflow_id,
            instance_id: self.instance_id,
            status: self.status.clone(),
            start_date,
            end_date,
        })
    }
}

/// Bulk-delete result payload.
#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: u64,
}

/// GET /api/executions
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ExecutionQueryParams>,
) -> AppResult<Json<Paginated<ExecutionWithContext>>> {
    let filter = params.to_filter()?;
    let page = clamp_page(params.page);
    let limit = clamp_limit(params.limit);

    let result = ExecutionRepo::page(&state.pool, &filter, page, limit).await?;
    let pagination = Pagination::new(page, limit, result.total);
    Ok(Json(Paginated::new(result.items, pagination)))
}

/// POST /api/executions
///
/// Records a mirrored execution. The referenced workflow must exist
/// (404 otherwise) and the status must be in the known vocabulary.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateExecution>,
) -> AppResult<(StatusCode, Json<ApiResponse<Execution>>)> {
    input.validate()?;
    ExecutionStatus::parse(&input.status).map_err(AppError::Core)?;

    if WorkflowRepo::find_by_id(&state.pool, input.workflow_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id: input.workflow_id,
        }));
    }

    let execution = ExecutionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(execution))))
}

/// GET /api/executions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ExecutionWithContext>>> {
    let execution = ExecutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Execution",
            id,
        }))?;
    Ok(Json(ApiResponse::new(execution)))
}

/// DELETE /api/executions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<MessageData>>> {
    let deleted = ExecutionRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Execution",
            id,
        }));
    }
    Ok(Json(ApiResponse::new(MessageData {
        message: "Execution deleted",
    })))
}

/// DELETE /api/executions
///
/// Removes every execution matching the query filters and reports the
/// count. An unfiltered call clears the whole mirror, which the console
/// uses for "purge history".
pub async fn delete_many(
    State(state): State<AppState>,
    Query(params): Query<ExecutionQueryParams>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let filter = params.to_filter()?;
    let deleted = ExecutionRepo::delete_by_filter(&state.pool, &filter).await?;
    tracing::info!(deleted, "Executions purged");
    Ok(Json(ApiResponse::new(DeletedCount { deleted })))
}

/// GET /api/executions/export?format=json|csv
///
/// Honors the same filters as the list endpoint, without pagination.
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<ExecutionQueryParams>,
) -> AppResult<axum::response::Response> {
    let format = ExportFormat::from_param(params.format.as_deref())?;
    let filter = params.to_filter()?;
    let executions = ExecutionRepo::list(&state.pool, &filter).await?;

    match format {
        ExportFormat::Csv => {
            let mut csv = String::from(
                "id,execution_id,workflow_id,workflow_name,instance_name,status,started_at,finished_at,duration_ms\n",
            );
            for execution in &executions {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{}\n",
                    execution.id,
                    csv_field(&execution.execution_id),
                    execution.workflow_id,
                    csv_field(&execution.workflow.name),
                    csv_field(&execution.workflow.instance.name),
                    execution.status,
                    execution.started_at.to_rfc3339(),
                    execution
                        .finished_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default(),
                    execution
                        .duration_ms
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                ));
            }
            Ok(csv_response("executions.csv", csv))
        }
        ExportFormat::Json => Ok(Json(ApiResponse::new(executions)).into_response()),
    }
}
