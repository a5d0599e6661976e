//! HTTP client for the Dayboard service.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use dayboard_core::{
    Event, EventColor, EventRange, FieldViolation, Task, TaskPriority, TaskStatus, ValidationError,
};

use crate::error::ClientError;

/// `POST /tasks` payload.
#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

/// `PATCH /tasks/{id}` payload. An absent field is left untouched;
/// `description: Some(None)` serializes as `null` and clears it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

/// `POST /events` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<EventColor>,
}

/// `PATCH /events/{id}` payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<EventColor>,
}

#[derive(Deserialize)]
struct TaskListResponse {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct EventListResponse {
    events: Vec<Event>,
}

/// Error body the service sends for 4xx and 5xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    violations: Option<Vec<FieldViolation>>,
}

/// Client for the Dayboard HTTP API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /tasks
    #[instrument(skip(self), level = "debug")]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = format!("{}/tasks", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        let body: TaskListResponse = response.json().await?;
        Ok(body.tasks)
    }

    /// POST /tasks
    #[instrument(skip(self, task), fields(title = %task.title), level = "debug")]
    pub async fn create_task(&self, task: &TaskCreate) -> Result<Task, ClientError> {
        let url = format!("{}/tasks", self.base_url);
        let response = self.client.post(&url).json(task).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// PATCH /tasks/{id}
    #[instrument(skip(self, patch), level = "debug")]
    pub async fn update_task(&self, id: Uuid, patch: &TaskUpdate) -> Result<Task, ClientError> {
        let url = format!("{}/tasks/{}", self.base_url, id);
        let response = self.client.patch(&url).json(patch).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// DELETE /tasks/{id}
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let url = format!("{}/tasks/{}", self.base_url, id);
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// GET /events, optionally bounded to a window.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_events(&self, range: EventRange) -> Result<Vec<Event>, ClientError> {
        let mut url = format!("{}/events", self.base_url);
        let mut params = Vec::new();
        if let Some(from) = range.from {
            params.push(format!("from={}", urlencoding::encode(&from.to_rfc3339())));
        }
        if let Some(to) = range.to {
            params.push(format!("to={}", urlencoding::encode(&to.to_rfc3339())));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        let body: EventListResponse = response.json().await?;
        Ok(body.events)
    }

    /// POST /events
    #[instrument(skip(self, event), fields(title = %event.title), level = "debug")]
    pub async fn create_event(&self, event: &EventCreate) -> Result<Event, ClientError> {
        let url = format!("{}/events", self.base_url);
        let response = self.client.post(&url).json(event).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// PATCH /events/{id}
    #[instrument(skip(self, patch), level = "debug")]
    pub async fn update_event(&self, id: Uuid, patch: &EventUpdate) -> Result<Event, ClientError> {
        let url = format!("{}/events/{}", self.base_url, id);
        let response = self.client.patch(&url).json(patch).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// DELETE /events/{id}
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_event(&self, id: Uuid) -> Result<(), ClientError> {
        let url = format!("{}/events/{}", self.base_url, id);
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// GET /health
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Map error statuses to [`ClientError`], passing successes through.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => {
                if status == reqwest::StatusCode::BAD_REQUEST {
                    let violations = body.violations.unwrap_or_else(|| {
                        vec![FieldViolation {
                            field: "body".to_string(),
                            message: body.error.clone(),
                        }]
                    });
                    return Err(ClientError::Validation(ValidationError { violations }));
                }
                body.error
            }
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }

        tracing::warn!(status = status.as_u16(), %message, "API request failed");
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
