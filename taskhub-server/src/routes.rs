//! HTTP surface of the task API.
//!
//! Maps each store operation to one endpoint, translates gateway errors
//! into JSON responses, and exposes the live-events WebSocket feed. All
//! `/api` routes sit behind [`crate::auth::require_auth`], so handlers
//! always run with a verified [`OwnerId`] extension.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/api/tasks` | 200, array of tasks |
//! | POST | `/api/tasks` | 201, created task |
//! | PUT | `/api/tasks/{id}` | 200, updated task |
//! | DELETE | `/api/tasks/{id}` | 200, confirmation message |
//! | GET | `/api/recent-tasks` | 200, up to 5 newest tasks |
//! | GET | `/api/events` | 101, WebSocket upgrade |
//! | GET | `/` | 200, text banner |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router, middleware};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use taskhub_model::event::{self, TaskEvent};
use taskhub_model::fields::{TaskFields, TaskPatch, ValidationError};
use taskhub_model::task::{OwnerId, TaskId};

use crate::auth;
use crate::events::EventBus;
use crate::store::{StoreError, TaskStore};

/// Number of tasks returned by the recent-tasks view.
pub const RECENT_TASKS_LIMIT: usize = 5;

/// Shared state handed to every handler.
pub struct AppState<S> {
    /// The owner-scoped task store.
    pub store: Arc<S>,
    /// Fan-out hub for push events.
    pub events: Arc<EventBus>,
    /// Secret used to verify bearer tokens.
    pub jwt_secret: Arc<String>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            events: Arc::clone(&self.events),
            jwt_secret: Arc::clone(&self.jwt_secret),
        }
    }
}

impl<S: TaskStore> AppState<S> {
    /// Creates the server state around a store and signing secret.
    pub fn new(store: S, jwt_secret: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            events: Arc::new(EventBus::new()),
            jwt_secret: Arc::new(jwt_secret.into()),
        }
    }
}

/// JSON body used by every failure response.
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

/// 400 response carrying per-field validation messages.
fn validation_response(err: &ValidationError) -> Response {
    let mut errors = serde_json::Map::new();
    for violation in &err.violations {
        errors.insert(
            violation.field.to_string(),
            serde_json::Value::String(violation.message.clone()),
        );
    }
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: "Validation Error".to_string(),
            errors: Some(errors),
        }),
    )
        .into_response()
}

/// 404 response that is identical whether the id is unknown or belongs to
/// a different owner.
fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Task not found")),
    )
        .into_response()
}

/// 400 response for bodies that fail to deserialize (bad JSON, unknown
/// fields, wrong types).
fn body_rejection_response(rejection: &JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new(format!("Invalid request body: {rejection}"))),
    )
        .into_response()
}

/// Translates gateway failures into client responses. Validation keeps
/// its per-field detail, not-found stays generic, and anything else is
/// logged server-side and reduced to a generic message.
fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::Validation(validation) => validation_response(&validation),
        StoreError::NotFound => not_found_response(),
        StoreError::Storage(detail) => {
            tracing::error!(error = %detail, "task store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("Server error")),
            )
                .into_response()
        }
    }
}

/// GET /api/tasks - every task owned by the caller.
async fn list_tasks<S: TaskStore>(
    State(state): State<AppState<S>>,
    Extension(owner): Extension<OwnerId>,
) -> Response {
    match state.store.list(&owner).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(err) => store_error_response(err),
    }
}

/// POST /api/tasks - create a task for the caller.
async fn create_task<S: TaskStore>(
    State(state): State<AppState<S>>,
    Extension(owner): Extension<OwnerId>,
    payload: Result<Json<TaskFields>, JsonRejection>,
) -> Response {
    let fields = match payload {
        Ok(Json(fields)) => fields,
        Err(rejection) => return body_rejection_response(&rejection),
    };

    match state.store.create(&owner, &fields).await {
        Ok(task) => {
            tracing::info!(owner = %owner, task = %task.id, "task created");
            let delivered = state
                .events
                .publish(&owner, TaskEvent::TaskAdded { task: task.clone() })
                .await;
            tracing::debug!(owner = %owner, subscribers = delivered, "published add event");
            (StatusCode::CREATED, Json(task)).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// PUT /api/tasks/{id} - update the caller's task.
async fn update_task<S: TaskStore>(
    State(state): State<AppState<S>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Response {
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return body_rejection_response(&rejection),
    };
    // A non-UUID id can never match a task, so it gets the same answer.
    let Ok(id) = id.parse::<TaskId>() else {
        return not_found_response();
    };

    match state.store.update(&owner, &id, &patch).await {
        Ok(task) => {
            tracing::info!(owner = %owner, task = %task.id, "task updated");
            state
                .events
                .publish(&owner, TaskEvent::TaskUpdated { task: task.clone() })
                .await;
            (StatusCode::OK, Json(task)).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// DELETE /api/tasks/{id} - permanently remove the caller's task.
async fn delete_task<S: TaskStore>(
    State(state): State<AppState<S>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.parse::<TaskId>() else {
        return not_found_response();
    };

    match state.store.delete(&owner, &id).await {
        Ok(()) => {
            tracing::info!(owner = %owner, task = %id, "task deleted");
            state.events.publish(&owner, TaskEvent::TaskDeleted { id }).await;
            (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "Task removed successfully" })),
            )
                .into_response()
        }
        Err(err) => store_error_response(err),
    }
}

/// GET /api/recent-tasks - the caller's most recently created tasks,
/// newest first.
async fn recent_tasks<S: TaskStore>(
    State(state): State<AppState<S>>,
    Extension(owner): Extension<OwnerId>,
) -> Response {
    match state.store.recent(&owner, RECENT_TASKS_LIMIT).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(err) => store_error_response(err),
    }
}

/// GET /api/events - upgrade to the caller's live change feed.
///
/// The subscription is taken before the upgrade response is produced, so
/// no event published after the client sees the 101 can be missed.
async fn subscribe_events<S: TaskStore>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<S>>,
    Extension(owner): Extension<OwnerId>,
) -> Response {
    let rx = state.events.subscribe(&owner).await;
    ws.on_upgrade(move |socket| stream_events(socket, rx, owner))
}

/// Forwards the owner's events onto the socket until either side closes.
async fn stream_events(
    socket: WebSocket,
    mut rx: broadcast::Receiver<TaskEvent>,
    owner: OwnerId,
) {
    let (mut sender, mut receiver) = socket.split();
    tracing::info!(owner = %owner, "event subscriber connected");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => match event::encode(&event) {
                    Ok(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(owner = %owner, error = %e, "failed to encode event");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(owner = %owner, missed, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {
                    // Clients have nothing to say on this channel; ignore.
                }
            },
        }
    }

    tracing::info!(owner = %owner, "event subscriber disconnected");
}

/// GET / - liveness banner.
#[allow(clippy::unused_async)]
async fn root() -> &'static str {
    "Task Management API is running"
}

/// Fallback for unmatched routes.
#[allow(clippy::unused_async)]
async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Route not found")),
    )
        .into_response()
}

/// Builds the full router: authenticated `/api` routes, the public
/// banner, and the JSON 404 fallback.
pub fn create_router<S: TaskStore + 'static>(state: AppState<S>) -> Router {
    let api = Router::new()
        .route(
            "/api/tasks",
            get(list_tasks::<S>).post(create_task::<S>),
        )
        .route(
            "/api/tasks/{id}",
            put(update_task::<S>).delete(delete_task::<S>),
        )
        .route("/api/recent-tasks", get(recent_tasks::<S>))
        .route("/api/events", get(subscribe_events::<S>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.jwt_secret),
            auth::require_auth,
        ));

    Router::new()
        .merge(api)
        .route("/", get(root))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the API server on the given address and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server<S: TaskStore + 'static>(
    addr: &str,
    state: AppState<S>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task api server error");
        }
    });

    Ok((bound_addr, handle))
}
