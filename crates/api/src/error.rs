use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowdeck_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the uniform
/// `{"success": false, "error": ..., "details": ...}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `flowdeck_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request-body validation failure with per-field messages.
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    /// The external instance could not be reached or rejected the probe.
    #[error("Upstream failure: {message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
                // Handler-level uniqueness pre-checks report 400; the 409
                // below is reserved for writes that race past them.
                CoreError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Request validation ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(validation_details(errors)),
            ),

            // --- Connectivity check failures ---
            AppError::Upstream { message, details } => (
                StatusCode::BAD_REQUEST,
                message.clone(),
                details.clone().map(serde_json::Value::String),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "error": message,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Flatten [`validator::ValidationErrors`] into `[{field, message}]` pairs.
fn validation_details(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut details: Vec<serde_json::Value> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field: &str = &field;
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value for {field}"));
            details.push(json!({ "field": field, "message": message }));
        }
    }
    serde_json::Value::Array(details)
}

/// Classify a sqlx error into an HTTP status, message, and details.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409. These only occur when a write races past the handler's
///   own uniqueness pre-check.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, Option<serde_json::Value>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
                None,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
                None,
            )
        }
    }
}
