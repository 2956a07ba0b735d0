//! Shared query parameter types and parsing helpers.

use flowdeck_core::types::Timestamp;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Generic pagination parameters (`?page=&limit=`).
///
/// Values are clamped via `flowdeck_db::clamp_page` / `clamp_limit`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Parse a date-range boundary.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date. A bare
/// date expands to the start of that day, or -- when `end_of_day` is set --
/// to the last representable instant of it, so that `endDate=2026-08-06`
/// includes the whole day.
pub fn parse_date_param(value: &str, end_of_day: bool) -> AppResult<Timestamp> {
    if let Ok(ts) = value.parse::<Timestamp>() {
        return Ok(ts);
    }

    let date: chrono::NaiveDate = value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{value}'")))?;

    let naive = if end_of_day {
        date.and_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    // Both constructions are in range for any valid NaiveDate.
    let naive = naive.ok_or_else(|| AppError::BadRequest(format!("Invalid date '{value}'")))?;

    Ok(chrono::DateTime::from_naive_utc_and_offset(
        naive,
        chrono::Utc,
    ))
}
