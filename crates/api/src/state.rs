use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: flowdeck_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Shared outbound HTTP client for connectivity checks. One client
    /// keeps connection pooling in one place instead of ambient globals.
    pub http: reqwest::Client,
}
