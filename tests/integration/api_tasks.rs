//! End-to-end tests for the task API: client library against an
//! in-process server over real HTTP.
//!
//! Covers the CRUD contract, ownership scoping, validation translation,
//! and the recent-tasks view.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use taskhub::api::{ApiError, TasksApi};
use taskhub::views;
use taskhub_model::fields::{TaskFields, TaskPatch};
use taskhub_model::task::{OwnerId, TaskId, TaskStatus};
use taskhub_server::auth;
use taskhub_server::routes::{self, AppState};
use taskhub_server::store::MemoryStore;

const SECRET: &str = "integration-secret";

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts the full server on an OS-assigned port, returning its base URL.
async fn spawn_server() -> String {
    let state = AppState::new(MemoryStore::new(), SECRET);
    let (addr, _handle) = routes::start_server("127.0.0.1:0", state)
        .await
        .expect("failed to start test server");
    format!("http://{addr}")
}

/// Builds an authenticated API client for the given owner.
fn api_for(base: &str, owner: &str) -> TasksApi {
    let token = auth::issue(SECRET, &OwnerId::new(owner), 3600).expect("mint token");
    TasksApi::new(base, token)
}

fn fields(title: &str) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        ..TaskFields::default()
    }
}

// ---------------------------------------------------------------------------
// CRUD contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_task_lists_exactly_once_with_matching_fields() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    let mut full = fields("Plan the trip");
    full.description = Some("flights and hotels".to_string());
    full.status = Some("in progress".to_string());
    full.priority = Some(4);
    full.tags = vec!["travel".to_string(), "summer".to_string()];
    full.is_recurring = true;

    let created = api.create(&full).await.unwrap();
    assert_eq!(created.title, "Plan the trip");
    assert_eq!(created.status, TaskStatus::InProgress);
    assert_eq!(created.priority, 4);
    assert_eq!(created.tags, vec!["travel", "summer"]);
    assert!(created.is_recurring);
    assert_eq!(created.created_at, created.updated_at);

    let listed = api.list().await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn update_with_same_fields_round_trips() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    let mut full = fields("Round trip");
    full.description = Some("unchanged".to_string());
    full.status = Some("ToDo".to_string());
    full.priority = Some(3);
    full.tags = vec!["once".to_string()];

    let created = api.create(&full).await.unwrap();
    let patch = TaskPatch {
        title: Some(full.title.clone()),
        description: full.description.clone(),
        status: full.status.clone(),
        due_date: full.due_date,
        priority: full.priority,
        tags: Some(full.tags.clone()),
        is_recurring: Some(full.is_recurring),
    };
    let updated = api.update(&created.id, &patch).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner, created.owner);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.priority, created.priority);
    assert_eq!(updated.tags, created.tags);
    assert_eq!(updated.is_recurring, created.is_recurring);
}

#[tokio::test]
async fn update_changes_status_and_bumps_updated_at() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    let created = api.create(&fields("Finish me")).await.unwrap();
    let patch = TaskPatch {
        status: Some("completed".to_string()),
        ..TaskPatch::default()
    };
    let updated = api.update(&created.id, &patch).await.unwrap();
    assert_eq!(updated.status, TaskStatus::Completed);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn delete_removes_and_second_delete_is_not_found() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    let created = api.create(&fields("Doomed")).await.unwrap();
    api.delete(&created.id).await.unwrap();
    assert!(api.list().await.unwrap().is_empty());

    let err = api.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn delete_of_unknown_id_leaves_list_unaffected() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    api.create(&fields("Survivor")).await.unwrap();
    let err = api.delete(&TaskId::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(api.list().await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Validation translation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn out_of_range_priority_update_is_rejected_without_partial_write() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    let created = api.create(&fields("Keep me intact")).await.unwrap();
    for bad in [0, 6] {
        let patch = TaskPatch {
            priority: Some(bad),
            title: Some("Should not stick".to_string()),
            ..TaskPatch::default()
        };
        let err = api.update(&created.id, &patch).await.unwrap_err();
        match err {
            ApiError::Validation { errors, .. } => {
                assert!(errors.contains_key("priority"), "priority {bad}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    let listed = api.list().await.unwrap();
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn missing_title_is_a_field_error_on_create() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    let err = api.create(&fields("  ")).await.unwrap_err();
    match err {
        ApiError::Validation { message, errors } => {
            assert_eq!(message, "Validation Error");
            assert!(errors.contains_key("title"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Ownership scoping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn another_owners_task_is_invisible_and_untouchable() {
    let base = spawn_server().await;
    let alice = api_for(&base, "alice");
    let bob = api_for(&base, "bob");

    let created = alice.create(&fields("Alice's secret")).await.unwrap();

    // Invisible in B's list.
    assert!(bob.list().await.unwrap().is_empty());

    // Update and delete both answer NotFound, indistinguishable from a
    // task that does not exist at all.
    let patch = TaskPatch {
        title: Some("Bob was here".to_string()),
        ..TaskPatch::default()
    };
    assert!(matches!(
        bob.update(&created.id, &patch).await.unwrap_err(),
        ApiError::NotFound { .. }
    ));
    assert!(matches!(
        bob.delete(&created.id).await.unwrap_err(),
        ApiError::NotFound { .. }
    ));

    // Alice's task is untouched.
    let listed = alice.list().await.unwrap();
    assert_eq!(listed[0].title, "Alice's secret");
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let base = spawn_server().await;
    let token = auth::issue(SECRET, &OwnerId::new("alice"), -3600).expect("mint token");
    let api = TasksApi::new(&base, token);

    let err = api.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated { .. }));
}

#[tokio::test]
async fn token_signed_with_another_secret_is_unauthenticated() {
    let base = spawn_server().await;
    let token = auth::issue("some-other-secret", &OwnerId::new("alice"), 3600).expect("mint");
    let api = TasksApi::new(&base, token);

    let err = api.create(&fields("never stored")).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated { .. }));
}

// ---------------------------------------------------------------------------
// Recent-tasks view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recent_returns_up_to_five_newest_first() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    for i in 0..7 {
        api.create(&fields(&format!("task-{i}"))).await.unwrap();
    }

    let recent = api.recent().await.unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].title, "task-6");
    assert_eq!(recent[4].title, "task-2");
    for pair in recent.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

// ---------------------------------------------------------------------------
// Fetched list feeding the derived views
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetched_list_drives_the_dashboard_summary() {
    let base = spawn_server().await;
    let api = api_for(&base, "alice");

    for status in ["pending", "ToDo", "in progress", "completed", "completed"] {
        let mut f = fields(status);
        f.status = Some(status.to_string());
        api.create(&f).await.unwrap();
    }

    let tasks = api.list().await.unwrap();
    let counts = views::summary(&tasks);
    assert_eq!(counts.total, 5);
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.pending, 2);
}
