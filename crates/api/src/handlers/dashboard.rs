//! Handler for `GET /api/dashboard/stats`.
//!
//! One batch of independent read queries, issued concurrently and joined
//! before responding. The bucketing and rate formatting live in
//! `flowdeck_core::stats` so they stay unit-testable.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use flowdeck_core::stats::{daily_breakdown, success_rate, DailyStat, TRAILING_DAYS};
use flowdeck_core::types::Timestamp;
use flowdeck_db::models::execution::ExecutionWithContext;
use flowdeck_db::models::instance::StatusCount;
use flowdeck_db::repositories::{ExecutionRepo, InstanceRepo, WorkflowRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Number of rows in the recent-executions widget.
const RECENT_EXECUTIONS: i64 = 5;

/// Headline counters for the overview cards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_instances: i64,
    pub active_instances: i64,
    pub total_workflows: i64,
    pub active_workflows: i64,
    pub today_executions: i64,
    /// Percentage string with one decimal; `"0%"` when nothing ran today.
    pub success_rate: String,
}

/// Full dashboard payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: DashboardOverview,
    pub daily_stats: Vec<DailyStat>,
    pub instance_stats: Vec<StatusCount>,
    pub recent_executions: Vec<ExecutionWithContext>,
}

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let now = Utc::now();
    let today = now.date_naive();
    let today_start: Timestamp = today
        .and_hms_opt(0, 0, 0)
        .map(|naive| chrono::DateTime::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or(now);
    let tomorrow_start = today_start + Duration::days(1);
    let window_start = today_start - Duration::days(TRAILING_DAYS - 1);

    let (
        total_instances,
        active_instances,
        total_workflows,
        active_workflows,
        today_executions,
        today_successes,
        window_rows,
        instance_stats,
        recent_executions,
    ) = tokio::try_join!(
        InstanceRepo::count_all(&state.pool),
        InstanceRepo::count_active(&state.pool),
        WorkflowRepo::count_all(&state.pool),
        WorkflowRepo::count_active(&state.pool),
        ExecutionRepo::count_started_between(&state.pool, today_start, tomorrow_start, None),
        ExecutionRepo::count_started_between(
            &state.pool,
            today_start,
            tomorrow_start,
            Some("success")
        ),
        ExecutionRepo::started_since(&state.pool, window_start),
        InstanceRepo::count_by_status(&state.pool),
        ExecutionRepo::recent(&state.pool, RECENT_EXECUTIONS),
    )?;

    let overview = DashboardOverview {
        total_instances,
        active_instances,
        total_workflows,
        active_workflows,
        today_executions,
        success_rate: success_rate(today_executions, today_successes),
    };

    let daily_stats = daily_breakdown(today, &window_rows);

    Ok(Json(ApiResponse::new(DashboardStats {
        overview,
        daily_stats,
        instance_stats,
        recent_executions,
    })))
}
