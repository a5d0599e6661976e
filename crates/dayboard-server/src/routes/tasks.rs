//! Task endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use dayboard_core::{CreateTaskRequest, Task, UpdateTaskRequest};

use crate::routes::{ApiError, ApiJson};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", axum::routing::patch(update_task).delete(delete_task))
}

/// Response envelope for GET /tasks
#[derive(Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// GET /tasks - List all tasks, ordered by creation time
async fn list_tasks(State(state): State<AppState>) -> Result<Json<TaskList>, ApiError> {
    let tasks = state.with_store(|store| store.list_tasks()).await?;
    Ok(Json(TaskList { tasks }))
}

/// POST /tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let new_task = req.validate()?;
    let task = state.with_store(move |store| store.create_task(&new_task)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /tasks/:id - Partially update a task
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let patch = req.validate()?;
    let task = state.with_store(move |store| store.update_task(id, patch)).await?;
    Ok(Json(task))
}

/// DELETE /tasks/:id - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_task(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
