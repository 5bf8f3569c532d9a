//! Typed HTTP client for the task API.
//!
//! Thin wrapper over `reqwest` carrying the caller's bearer token and
//! mapping failure responses back to a typed [`ApiError`]. A failed call
//! changes nothing client-side; callers keep their cache as-is and
//! surface the error message.

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use taskhub_model::fields::{TaskFields, TaskPatch};
use taskhub_model::task::{Task, TaskId};

/// Errors surfaced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (connection, timeout, body decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was missing, invalid, or expired. Re-authenticate out
    /// of band; retrying with the same token cannot succeed.
    #[error("unauthenticated: {message}")]
    Unauthenticated {
        /// Server-provided reason.
        message: String,
    },

    /// The server rejected one or more fields.
    #[error("validation failed: {message}")]
    Validation {
        /// Overall error message.
        message: String,
        /// Per-field messages, keyed by JSON field name.
        errors: HashMap<String, String>,
    },

    /// No task with that id exists for this caller.
    #[error("not found: {message}")]
    NotFound {
        /// Server-provided reason.
        message: String,
    },

    /// The server failed; the message carries no internal detail.
    #[error("server error: {message}")]
    Server {
        /// Generic server message.
        message: String,
    },
}

/// Failure body shape shared by every error response.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Option<HashMap<String, String>>,
}

/// Maps a failure status and body to the matching [`ApiError`].
fn error_from(status: StatusCode, body: ErrorBody) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthenticated {
            message: body.message,
        },
        StatusCode::BAD_REQUEST => ApiError::Validation {
            message: body.message,
            errors: body.errors.unwrap_or_default(),
        },
        StatusCode::NOT_FOUND => ApiError::NotFound {
            message: body.message,
        },
        _ => ApiError::Server {
            message: body.message,
        },
    }
}

/// Client for the task endpoints, bound to one base URL and bearer token.
pub struct TasksApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TasksApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000`)
    /// authenticating with `token`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// GET /api/tasks - every task owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.send(self.client.get(self.url("/api/tasks"))).await
    }

    /// POST /api/tasks - create a task from the given fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with per-field messages when the
    /// fields are rejected.
    pub async fn create(&self, fields: &TaskFields) -> Result<Task, ApiError> {
        self.send(self.client.post(self.url("/api/tasks")).json(fields))
            .await
    }

    /// PUT /api/tasks/{id} - update the task with the given patch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the id does not name one of
    /// the caller's tasks.
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.send(
            self.client
                .put(self.url(&format!("/api/tasks/{id}")))
                .json(patch),
        )
        .await
    }

    /// DELETE /api/tasks/{id} - permanently remove the task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the id does not name one of
    /// the caller's tasks.
    pub async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        let _confirmation: serde_json::Value = self
            .send(self.client.delete(self.url(&format!("/api/tasks/{id}"))))
            .await?;
        Ok(())
    }

    /// GET /api/recent-tasks - the newest tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    pub async fn recent(&self) -> Result<Vec<Task>, ApiError> {
        self.send(self.client.get(self.url("/api/recent-tasks")))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(error_from(status, body))
    }
}
