//! Task entity, wire payloads, and validation.
//!
//! Raw request types mirror the JSON bodies exactly (enums as strings) so
//! validation can report every bad field by its wire name; `validate()`
//! normalizes them into typed values the store can trust.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::patch::double_option;
use crate::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};

/// Kanban column a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board-column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!(
                "Unknown status: {} (expected todo, in_progress or done)",
                other
            )),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!(
                "Unknown priority: {} (expected low, medium or high)",
                other
            )),
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored task as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `POST /tasks` body. `title` is optional here so that a missing
/// title surfaces as a violation alongside the rest, not as a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Validated fields for a task about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
}

impl CreateTaskRequest {
    /// Normalize into a [`NewTask`], collecting every violation.
    ///
    /// Omitted `priority` defaults to `medium`; new tasks always start in
    /// `todo`.
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        let mut errors = ValidationError::new();

        check_title(self.title.as_deref(), &mut errors);
        check_description(self.description.as_deref(), &mut errors);

        let priority = match self.priority.as_deref() {
            None => TaskPriority::default(),
            Some(raw) => match raw.parse() {
                Ok(p) => p,
                Err(msg) => {
                    errors.add("priority", msg);
                    TaskPriority::default()
                }
            },
        };

        match self.title {
            Some(title) if errors.is_empty() => Ok(NewTask {
                title,
                description: self.description,
                priority,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw `PATCH /tasks/{id}` body. Absent fields stay unchanged; an explicit
/// `null` description clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Validated partial update for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTaskRequest {
    /// Normalize into a [`TaskPatch`], collecting every violation.
    pub fn validate(self) -> Result<TaskPatch, ValidationError> {
        let mut errors = ValidationError::new();

        if self.title.is_some() {
            check_title(self.title.as_deref(), &mut errors);
        }
        if let Some(Some(ref description)) = self.description {
            check_description(Some(description), &mut errors);
        }

        let status = parse_present(self.status.as_deref(), "status", &mut errors);
        let priority = parse_present(self.priority.as_deref(), "priority", &mut errors);

        errors.into_result(TaskPatch {
            title: self.title,
            description: self.description,
            status,
            priority,
        })
    }
}

/// Parse an optional wire enum, recording a violation under `field` on
/// failure.
pub(crate) fn parse_present<T: std::str::FromStr<Err = String>>(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationError,
) -> Option<T> {
    match raw {
        None => None,
        Some(s) => match s.parse() {
            Ok(value) => Some(value),
            Err(msg) => {
                errors.add(field, msg);
                None
            }
        },
    }
}

/// A missing title and a blank title are the same violation.
pub(crate) fn check_title(title: Option<&str>, errors: &mut ValidationError) {
    match title {
        None => errors.add("title", "Title is required"),
        Some(title) if title.trim().is_empty() => errors.add("title", "Title is required"),
        Some(title) if title.chars().count() > MAX_TITLE_LENGTH => errors.add(
            "title",
            format!("Title exceeds maximum length of {} characters", MAX_TITLE_LENGTH),
        ),
        Some(_) => {}
    }
}

pub(crate) fn check_description(description: Option<&str>, errors: &mut ValidationError) {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.add(
                "description",
                format!(
                    "Description exceeds maximum length of {} characters",
                    MAX_DESCRIPTION_LENGTH
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn create_applies_defaults() {
        let req = CreateTaskRequest {
            title: Some("Fix bug".to_string()),
            description: None,
            priority: None,
        };
        let new_task = req.validate().unwrap();
        assert_eq!(new_task.priority, TaskPriority::Medium);
        assert_eq!(new_task.description, None);
    }

    #[test]
    fn create_keeps_supplied_priority() {
        let req = CreateTaskRequest {
            title: Some("Fix bug".to_string()),
            description: Some("crash on startup".to_string()),
            priority: Some("high".to_string()),
        };
        let new_task = req.validate().unwrap();
        assert_eq!(new_task.priority, TaskPriority::High);
        assert_eq!(new_task.description.as_deref(), Some("crash on startup"));
    }

    #[test]
    fn create_collects_all_violations() {
        let req = CreateTaskRequest {
            title: Some("   ".to_string()),
            description: Some("d".repeat(2001)),
            priority: Some("urgent".to_string()),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.violations.len(), 3);
        assert!(err.names_field("title"));
        assert!(err.names_field("description"));
        assert!(err.names_field("priority"));
    }

    #[test]
    fn create_reports_missing_title_as_a_violation() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"priority": "urgent"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.names_field("title"));
        assert!(err.names_field("priority"));
    }

    #[test]
    fn create_rejects_overlong_title() {
        let req = CreateTaskRequest {
            title: Some("t".repeat(201)),
            description: None,
            priority: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.names_field("title"));

        let req = CreateTaskRequest {
            title: Some("t".repeat(200)),
            description: None,
            priority: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_absent_fields_stay_unset() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        let patch = req.validate().unwrap();
        assert_eq!(patch.status, Some(TaskStatus::Done));
        assert_eq!(patch.title, None);
        assert_eq!(patch.description, None);
        assert_eq!(patch.priority, None);
    }

    #[test]
    fn update_null_description_clears() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let patch = req.validate().unwrap();
        assert_eq!(patch.description, Some(None));
    }

    #[test]
    fn update_rejects_unknown_status() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"status": "blocked"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.names_field("status"));
    }

    #[test]
    fn status_round_trips_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: Uuid::nil(),
            title: "Fix bug".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"description\":null"));
        assert!(json.contains("\"priority\":\"high\""));
    }
}
