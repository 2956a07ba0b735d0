//! REST client for external n8n instances.
//!
//! The console treats the remote automation platform as an opaque HTTP
//! API; the only call it makes is a bounded connectivity probe.

mod api;

pub use api::{N8nApi, N8nApiError, CONNECT_TIMEOUT, HEALTH_PATH};
