//! Handlers for the `/instances` resource.
//!
//! Instances are registered external automation endpoints. Read responses
//! never include the stored API key; the connectivity check loads it
//! through a separate non-serializable credentials model.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use flowdeck_core::error::CoreError;
use flowdeck_core::status::{AuthType, InstanceStatus};
use flowdeck_core::types::DbId;
use flowdeck_db::models::instance::{CreateInstance, Instance, UpdateInstance};
use flowdeck_db::repositories::InstanceRepo;
use flowdeck_n8n::N8nApi;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::export::{csv_field, csv_response, ExportFormat, ExportParams};
use crate::response::{ApiResponse, MessageData};
use crate::state::AppState;

/// Result payload of a connectivity check.
#[derive(Debug, Serialize)]
pub struct ConnectionTestData {
    pub status: &'static str,
    pub message: String,
}

/// GET /api/instances
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Instance>>>> {
    let instances = InstanceRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::new(instances)))
}

/// POST /api/instances
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateInstance>,
) -> AppResult<(StatusCode, Json<ApiResponse<Instance>>)> {
    input.validate()?;
    if let Some(ref auth_type) = input.auth_type {
        AuthType::parse(auth_type).map_err(AppError::Core)?;
    }

    if InstanceRepo::name_exists(&state.pool, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An instance with this name already exists".to_string(),
        )));
    }

    let instance = InstanceRepo::create(&state.pool, &input).await?;
    tracing::info!(instance_id = instance.id, name = %instance.name, "Instance registered");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(instance))))
}

/// GET /api/instances/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Instance>>> {
    let instance = InstanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }))?;
    Ok(Json(ApiResponse::new(instance)))
}

/// PUT /api/instances/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInstance>,
) -> AppResult<Json<ApiResponse<Instance>>> {
    input.validate()?;
    if let Some(ref auth_type) = input.auth_type {
        AuthType::parse(auth_type).map_err(AppError::Core)?;
    }
    if let Some(ref status) = input.status {
        InstanceStatus::parse(status).map_err(AppError::Core)?;
    }

    let existing = InstanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }))?;

    // Re-check name uniqueness only when the name actually changes.
    if let Some(ref name) = input.name {
        if *name != existing.name && InstanceRepo::name_exists(&state.pool, name, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "An instance with this name already exists".to_string(),
            )));
        }
    }

    let instance = InstanceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }))?;
    Ok(Json(ApiResponse::new(instance)))
}

/// DELETE /api/instances/{id}
///
/// Owned workflows and their executions are removed by the declared
/// cascade.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<MessageData>>> {
    let deleted = InstanceRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }));
    }
    tracing::info!(instance_id = id, "Instance deleted");
    Ok(Json(ApiResponse::new(MessageData {
        message: "Instance deleted",
    })))
}

/// POST /api/instances/{id}/test
///
/// Probes the registered endpoint with a bounded GET. Upstream failures
/// come back as a 400 result, never as a server fault.
pub async fn test_connection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ConnectionTestData>>> {
    let credentials = InstanceRepo::find_credentials(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }))?;

    let api = N8nApi::with_client(state.http.clone(), credentials.api_base_url);
    match api.check_connectivity(&credentials.api_key).await {
        Ok(()) => Ok(Json(ApiResponse::new(ConnectionTestData {
            status: "success",
            message: "Connection test succeeded".to_string(),
        }))),
        Err(flowdeck_n8n::N8nApiError::ApiError { status, body }) => {
            tracing::warn!(instance_id = id, status, "Connectivity check rejected");
            Err(AppError::Upstream {
                message: format!("Connection failed with status {status}"),
                details: (!body.is_empty()).then_some(body),
            })
        }
        Err(flowdeck_n8n::N8nApiError::Request(err)) => {
            tracing::warn!(instance_id = id, error = %err, "Connectivity check failed");
            Err(AppError::Upstream {
                message: "Connection timed out or network error".to_string(),
                details: Some(err.to_string()),
            })
        }
    }
}

/// GET /api/instances/export?format=json|csv
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<axum::response::Response> {
    let format = ExportFormat::from_param(params.format.as_deref())?;
    let instances = InstanceRepo::list(&state.pool).await?;

    match format {
        ExportFormat::Csv => {
            let mut csv = String::from("id,name,api_base_url,auth_type,status,created_at,updated_at\n");
            for instance in &instances {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{}\n",
                    instance.id,
                    csv_field(&instance.name),
                    csv_field(&instance.api_base_url),
                    instance.auth_type,
                    instance.status,
                    instance.created_at.to_rfc3339(),
                    instance.updated_at.to_rfc3339(),
                ));
            }
            Ok(csv_response("instances.csv", csv))
        }
        ExportFormat::Json => Ok(Json(ApiResponse::new(instances)).into_response()),
    }
}
