//! Calendar event endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use dayboard_core::{CreateEventRequest, Event, EventRangeQuery, UpdateEventRequest};

use crate::routes::{ApiError, ApiJson};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", axum::routing::patch(update_event).delete(delete_event))
}

/// Response envelope for GET /events
#[derive(Serialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

/// GET /events?from&to - List events overlapping the window
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventRangeQuery>,
) -> Result<Json<EventList>, ApiError> {
    let range = query.validate()?;
    let events = state.with_store(move |store| store.list_events(range)).await?;
    Ok(Json(EventList { events }))
}

/// POST /events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let new_event = req.validate()?;
    let event = state.with_store(move |store| store.create_event(&new_event)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PATCH /events/:id - Partially update an event
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let patch = req.validate()?;
    let event = state.with_store(move |store| store.update_event(id, patch)).await?;
    Ok(Json(event))
}

/// DELETE /events/:id - Delete an event
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.with_store(move |store| store.delete_event(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
