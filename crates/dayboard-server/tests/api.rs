//! End-to-end tests: real listener, real SQLite file, real HTTP client.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use dayboard_client::{ApiClient, ClientError, EventCreate, TaskCreate, TaskUpdate};
use dayboard_core::{EventRange, TaskPriority, TaskStatus};
use dayboard_server::routes;
use dayboard_server::state::AppState;
use dayboard_server::store::Store;
use uuid::Uuid;

/// Boot the service on an ephemeral port and return a client pointed at it.
async fn spawn_service() -> (ApiClient, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(&dir.path().join("dayboard.db3")).unwrap();
    let state = AppState::new(store);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (ApiClient::new(format!("http://{}", addr)), dir)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (client, _dir) = spawn_service().await;
    client.health_check().await.unwrap();
}

#[tokio::test]
async fn task_lifecycle_over_http() {
    let (client, _dir) = spawn_service().await;

    let created = client
        .create_task(&TaskCreate {
            title: "Fix bug".to_string(),
            description: None,
            priority: Some(TaskPriority::High),
        })
        .await
        .unwrap();
    assert_eq!(created.status, TaskStatus::Todo);
    assert_eq!(created.priority, TaskPriority::High);

    let updated = client
        .update_task(
            created.id,
            &TaskUpdate {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::Done);
    // Untouched fields survive the partial update.
    assert_eq!(updated.priority, TaskPriority::High);
    assert_eq!(updated.title, "Fix bug");

    let tasks = client.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Done);

    client.delete_task(created.id).await.unwrap();
    assert!(client.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_event_color_is_rejected_with_the_field_named() {
    let (client, _dir) = spawn_service().await;

    // Raw JSON on purpose; the typed client cannot express an unknown color.
    let response = reqwest::Client::new()
        .post(format!("{}/events", client.base_url()))
        .json(&serde_json::json!({
            "title": "Standup",
            "startAt": "2025-03-01T09:00:00Z",
            "endAt": "2025-03-01T10:00:00Z",
            "color": "red",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v["field"] == "color"));
    assert!(body.to_string().contains("red"));

    // Nothing was stored.
    assert!(client.list_events(EventRange::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_title_is_a_validation_error_not_a_deserialization_failure() {
    let (client, _dir) = spawn_service().await;

    let response = reqwest::Client::new()
        .post(format!("{}/tasks", client.base_url()))
        .json(&serde_json::json!({"priority": "urgent"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Both problems in one round trip, by wire field name.
    let body: serde_json::Value = response.json().await.unwrap();
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v["field"] == "title"));
    assert!(violations.iter().any(|v| v["field"] == "priority"));

    assert!(client.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn event_missing_timestamps_report_each_field() {
    let (client, _dir) = spawn_service().await;

    let response = reqwest::Client::new()
        .post(format!("{}/events", client.base_url()))
        .json(&serde_json::json!({"title": "Standup"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v["field"] == "startAt"));
    assert!(violations.iter().any(|v| v["field"] == "endAt"));
}

#[tokio::test]
async fn undeserializable_body_still_gets_the_error_shape() {
    let (client, _dir) = spawn_service().await;

    // Wrong type for title; serde rejects this before validation runs.
    let response = reqwest::Client::new()
        .post(format!("{}/tasks", client.base_url()))
        .json(&serde_json::json!({"title": 7}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v["field"] == "body"));
}

#[tokio::test]
async fn event_range_filter_over_http() {
    let (client, _dir) = spawn_service().await;

    let mk = |title: &str, start: &str, end: &str| EventCreate {
        title: title.to_string(),
        description: None,
        start_at: start.parse().unwrap(),
        end_at: end.parse().unwrap(),
        color: None,
    };

    client
        .create_event(&mk("before", "2025-02-27T09:00:00Z", "2025-02-27T10:00:00Z"))
        .await
        .unwrap();
    client
        .create_event(&mk("inside", "2025-03-02T09:00:00Z", "2025-03-02T10:00:00Z"))
        .await
        .unwrap();
    // Straddles the lower bound; overlap is enough to qualify.
    client
        .create_event(&mk("straddling", "2025-02-28T23:00:00Z", "2025-03-01T01:00:00Z"))
        .await
        .unwrap();

    let range = EventRange {
        from: Some("2025-03-01T00:00:00Z".parse().unwrap()),
        to: Some("2025-03-07T23:59:59Z".parse().unwrap()),
    };
    let events = client.list_events(range).await.unwrap();
    let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["straddling", "inside"]);

    // No bounds returns everything, ordered by start.
    let all = client.list_events(EventRange::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "before");
}

#[tokio::test]
async fn missing_resources_return_not_found() {
    let (client, _dir) = spawn_service().await;

    let err = client
        .update_task(Uuid::new_v4(), &TaskUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));

    let err = client.delete_event(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn deleting_twice_returns_not_found_the_second_time() {
    let (client, _dir) = spawn_service().await;

    let task = client
        .create_task(&TaskCreate {
            title: "Once".to_string(),
            description: None,
            priority: None,
        })
        .await
        .unwrap();

    client.delete_task(task.id).await.unwrap();
    let err = client.delete_task(task.id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}
