//! Asana API request and response models.
//!
//! Asana wraps every request and response body in a `data` envelope and
//! reports failures as `{"errors": [{"message": ...}]}`.

use serde::{Deserialize, Serialize};

/// `{"data": ...}` envelope used by every Asana endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// Body for `PUT /tasks/{task_gid}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTaskRequest {
    pub completed: bool,
}

/// Body for `POST /tasks/{task_gid}/stories`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateStoryRequest {
    pub text: String,
}

/// Authenticated user (`GET /users/me`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub gid: String,
    #[serde(default)]
    pub name: String,
}

/// Task as returned by the update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// Story (activity entry) created on a task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Story {
    pub gid: String,
    #[serde(default)]
    pub text: String,
}

/// Error body returned on non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

impl ErrorResponse {
    /// Join the error messages, or `None` if the body is not an Asana error.
    #[must_use]
    pub fn message(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        if parsed.errors.is_empty() {
            return None;
        }
        Some(
            parsed
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
