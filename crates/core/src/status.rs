//! Status vocabularies shared by the storage layer and the API.
//!
//! All three vocabularies are stored as plain text columns; the enums here
//! exist to validate inbound values and to keep the string constants in one
//! place.

use crate::error::CoreError;

/// Lifecycle status of a mirrored execution, as reported by the external
/// automation platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Error,
    Waiting,
    Running,
}

impl ExecutionStatus {
    pub const ALL: [ExecutionStatus; 4] = [
        ExecutionStatus::Success,
        ExecutionStatus::Error,
        ExecutionStatus::Waiting,
        ExecutionStatus::Running,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Waiting => "waiting",
            ExecutionStatus::Running => "running",
        }
    }

    /// Parse a status string, rejecting anything outside the vocabulary.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "success" => Ok(ExecutionStatus::Success),
            "error" => Ok(ExecutionStatus::Error),
            "waiting" => Ok(ExecutionStatus::Waiting),
            "running" => Ok(ExecutionStatus::Running),
            other => Err(CoreError::Validation(format!(
                "Unknown execution status '{other}' (expected one of: success, error, waiting, running)"
            ))),
        }
    }
}

/// Registration status of an external instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    Active,
    Inactive,
    Error,
}

impl InstanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceStatus::Active => "active",
            InstanceStatus::Inactive => "inactive",
            InstanceStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "active" => Ok(InstanceStatus::Active),
            "inactive" => Ok(InstanceStatus::Inactive),
            "error" => Ok(InstanceStatus::Error),
            other => Err(CoreError::Validation(format!(
                "Unknown instance status '{other}' (expected one of: active, inactive, error)"
            ))),
        }
    }
}

/// How the console authenticates against the external instance API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    ApiKey,
    BasicAuth,
}

impl AuthType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::ApiKey => "API_KEY",
            AuthType::BasicAuth => "BASIC_AUTH",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "API_KEY" => Ok(AuthType::ApiKey),
            "BASIC_AUTH" => Ok(AuthType::BasicAuth),
            other => Err(CoreError::Validation(format!(
                "Unknown auth type '{other}' (expected API_KEY or BASIC_AUTH)"
            ))),
        }
    }
}
