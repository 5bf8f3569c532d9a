//! End-to-end tests for the push channel: live feed subscription,
//! owner isolation, and cache convergence.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use taskhub::api::TasksApi;
use taskhub::cache::TaskCache;
use taskhub::sync::TaskFeed;
use taskhub_model::event::TaskEvent;
use taskhub_model::fields::{TaskFields, TaskPatch};
use taskhub_model::task::OwnerId;
use taskhub_server::auth;
use taskhub_server::routes::{self, AppState};
use taskhub_server::store::MemoryStore;

const SECRET: &str = "push-sync-secret";

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts the server and returns (http base URL, ws events URL).
async fn spawn_server() -> (String, String) {
    let state = AppState::new(MemoryStore::new(), SECRET);
    let (addr, _handle) = routes::start_server("127.0.0.1:0", state)
        .await
        .expect("failed to start test server");
    (format!("http://{addr}"), format!("ws://{addr}/api/events"))
}

fn token_for(owner: &str) -> String {
    auth::issue(SECRET, &OwnerId::new(owner), 3600).expect("mint token")
}

fn fields(title: &str) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        ..TaskFields::default()
    }
}

/// Receives the next event or panics after a grace period.
async fn next_within(feed: &mut TaskFeed, what: &str) -> TaskEvent {
    tokio::time::timeout(Duration::from_secs(5), feed.next_event())
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
        .unwrap_or_else(|| panic!("feed closed while waiting for {what}"))
}

// ---------------------------------------------------------------------------
// Feed delivery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_update_delete_arrive_as_events_in_order() {
    let (base, ws_url) = spawn_server().await;
    let api = TasksApi::new(&base, token_for("alice"));
    let mut feed = TaskFeed::connect(&ws_url, &token_for("alice"))
        .await
        .expect("connect feed");

    let created = api.create(&fields("Watch me")).await.unwrap();
    match next_within(&mut feed, "add event").await {
        TaskEvent::TaskAdded { task } => assert_eq!(task, created),
        other => panic!("expected TaskAdded, got {other:?}"),
    }

    let patch = TaskPatch {
        status: Some("completed".to_string()),
        ..TaskPatch::default()
    };
    let updated = api.update(&created.id, &patch).await.unwrap();
    match next_within(&mut feed, "update event").await {
        TaskEvent::TaskUpdated { task } => assert_eq!(task, updated),
        other => panic!("expected TaskUpdated, got {other:?}"),
    }

    api.delete(&created.id).await.unwrap();
    match next_within(&mut feed, "delete event").await {
        TaskEvent::TaskDeleted { id } => assert_eq!(id, created.id),
        other => panic!("expected TaskDeleted, got {other:?}"),
    }
}

#[tokio::test]
async fn feed_refuses_a_bad_token() {
    let (_base, ws_url) = spawn_server().await;
    let result = TaskFeed::connect(&ws_url, "garbage-token").await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Owner isolation on the push path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn another_owners_changes_never_reach_the_feed() {
    let (base, ws_url) = spawn_server().await;
    let alice = TasksApi::new(&base, token_for("alice"));
    let bob = TasksApi::new(&base, token_for("bob"));
    let mut bob_feed = TaskFeed::connect(&ws_url, &token_for("bob"))
        .await
        .expect("connect feed");

    // Alice's change must not appear on Bob's feed...
    alice.create(&fields("Alice only")).await.unwrap();
    // ...so the first thing Bob sees is his own change.
    let bobs_task = bob.create(&fields("Bob's own")).await.unwrap();
    match next_within(&mut bob_feed, "bob's add event").await {
        TaskEvent::TaskAdded { task } => assert_eq!(task, bobs_task),
        other => panic!("expected TaskAdded, got {other:?}"),
    }
    assert!(bob_feed.try_next_event().is_none());
}

// ---------------------------------------------------------------------------
// Cache convergence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cache_fed_by_events_converges_with_the_server_list() {
    let (base, ws_url) = spawn_server().await;
    let api = TasksApi::new(&base, token_for("alice"));

    // A task that exists before the session starts.
    api.create(&fields("pre-existing")).await.unwrap();

    let mut feed = TaskFeed::connect(&ws_url, &token_for("alice"))
        .await
        .expect("connect feed");

    // Initial full fetch populates the cache.
    let cache = TaskCache::new();
    cache.replace_all(api.list().await.unwrap());
    assert_eq!(cache.len(), 1);

    // A burst of changes, folded in incrementally via the feed.
    let second = api.create(&fields("second")).await.unwrap();
    let third = api.create(&fields("third")).await.unwrap();
    let patch = TaskPatch {
        title: Some("second, renamed".to_string()),
        ..TaskPatch::default()
    };
    api.update(&second.id, &patch).await.unwrap();
    api.delete(&third.id).await.unwrap();

    for _ in 0..4 {
        let event = next_within(&mut feed, "change event").await;
        cache.apply(&event);
    }

    let mut cached = cache.snapshot();
    let mut listed = api.list().await.unwrap();
    cached.sort_by_key(|t| t.id);
    listed.sort_by_key(|t| t.id);
    assert_eq!(cached, listed);
    assert!(cached.iter().any(|t| t.title == "second, renamed"));
}

#[tokio::test]
async fn replayed_events_do_not_disturb_the_cache() {
    let (base, ws_url) = spawn_server().await;
    let api = TasksApi::new(&base, token_for("alice"));
    let mut feed = TaskFeed::connect(&ws_url, &token_for("alice"))
        .await
        .expect("connect feed");

    let created = api.create(&fields("only one")).await.unwrap();
    let event = next_within(&mut feed, "add event").await;

    let cache = TaskCache::new();
    cache.apply(&event);
    cache.apply(&event);
    cache.apply(&event);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&created.id), Some(created));
}

// ---------------------------------------------------------------------------
// Teardown contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_ends_the_subscription() {
    let (base, ws_url) = spawn_server().await;
    let api = TasksApi::new(&base, token_for("alice"));
    let feed = TaskFeed::connect(&ws_url, &token_for("alice"))
        .await
        .expect("connect feed");

    feed.shutdown();

    // The server side notices the disconnect; later changes go nowhere
    // and the API keeps working.
    api.create(&fields("after shutdown")).await.unwrap();
    assert_eq!(api.list().await.unwrap().len(), 1);
}
