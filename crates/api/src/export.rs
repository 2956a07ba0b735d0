//! Shared pieces for the `/export` endpoints.
//!
//! Exports reuse each entity's list filters and return either the standard
//! JSON envelope or a hand-assembled CSV attachment.

use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Query parameters accepted by every export endpoint (entity-specific
/// filters are layered on top by the handlers).
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

/// Supported export formats. JSON is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_param(param: Option<&str>) -> AppResult<Self> {
        match param {
            None | Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            Some(other) => Err(AppError::BadRequest(format!(
                "Unknown export format '{other}' (expected json or csv)"
            ))),
        }
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build a `text/csv` attachment response.
pub fn csv_response(filename: &str, csv: String) -> Response {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(axum::body::Body::from(csv))
        .unwrap_or_else(|_| {
            // Header values above are static and valid; this arm is
            // unreachable in practice.
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
