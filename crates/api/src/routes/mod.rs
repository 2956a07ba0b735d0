pub mod dashboard;
pub mod execution;
pub mod health;
pub mod instance;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /instances                     list, create
/// /instances/export              export (json|csv)
/// /instances/{id}                get, update, delete
/// /instances/{id}/test           connectivity check (POST)
///
/// /workflows                     list, create
/// /workflows/export              export (json|csv)
/// /workflows/{id}                get, update, delete
///
/// /executions                    list, record, bulk delete
/// /executions/export             export (json|csv)
/// /executions/{id}               get, delete
///
/// /dashboard/stats               aggregated statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/instances", instance::router())
        .nest("/workflows", workflow::router())
        .nest("/executions", execution::router())
        .nest("/dashboard", dashboard::router())
}
