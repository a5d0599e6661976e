//! Task CRUD on the SQLite store.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use dayboard_core::{NewTask, Task, TaskPatch};

use super::{corrupt_column, Store, StoreError, StoreResult};

const TASK_COLUMNS: &str = "id, title, description, status, priority, created_at, updated_at";

impl Store {
    /// List all tasks, ordered by creation time ascending.
    pub fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM tasks ORDER BY created_at ASC",
                TASK_COLUMNS
            ))
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let rows = stmt
            .query_map([], row_to_task)
            .map_err(|e| StoreError::storage(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::storage(e.to_string()))
    }

    /// Insert a new task, assigning its id and both timestamps.
    pub fn create_task(&self, new_task: &NewTask) -> StoreResult<Task> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        self.conn
            .execute(
                r#"
                INSERT INTO tasks (id, title, description, status, priority, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    id.to_string(),
                    new_task.title,
                    new_task.description,
                    dayboard_core::TaskStatus::default().as_str(),
                    new_task.priority.as_str(),
                    now_str,
                    now_str,
                ],
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;

        tracing::debug!("Created task {}", id);

        Ok(Task {
            id,
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            status: dayboard_core::TaskStatus::default(),
            priority: new_task.priority,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a task by id. Returns `None` if it doesn't exist.
    pub fn get_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS))
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let mut rows = stmt
            .query(params![id.to_string()])
            .map_err(|e| StoreError::storage(e.to_string()))?;

        match rows.next().map_err(|e| StoreError::storage(e.to_string()))? {
            Some(row) => Ok(Some(
                row_to_task(row).map_err(|e| StoreError::storage(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Apply a partial update, refreshing `updated_at`.
    pub fn update_task(&self, id: Uuid, patch: TaskPatch) -> StoreResult<Task> {
        let mut task = self.get_task(id)?.ok_or_else(|| StoreError::not_found(id))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }

        task.updated_at = Utc::now();

        self.conn
            .execute(
                r#"
                UPDATE tasks
                SET title = ?1, description = ?2, status = ?3, priority = ?4, updated_at = ?5
                WHERE id = ?6
                "#,
                params![
                    task.title,
                    task.description,
                    task.status.as_str(),
                    task.priority.as_str(),
                    task.updated_at.to_rfc3339(),
                    id.to_string(),
                ],
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;

        tracing::debug!("Updated task {}", id);
        Ok(task)
    }

    /// Delete a task. A second delete of the same id is `NotFound`.
    pub fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])
            .map_err(|e| StoreError::storage(e.to_string()))?;

        if deleted == 0 {
            return Err(StoreError::not_found(id));
        }

        tracing::debug!("Deleted task {}", id);
        Ok(())
    }
}

/// Convert a database row to a Task.
fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let id_str: String = row.get(0)?;
    let status_str: String = row.get(3)?;
    let priority_str: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;
    let updated_at_str: String = row.get(6)?;

    Ok(Task {
        id: Uuid::parse_str(&id_str).map_err(|e| corrupt_column(0, e))?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: status_str.parse().map_err(|msg: String| corrupt_column(3, msg))?,
        priority: priority_str.parse().map_err(|msg: String| corrupt_column(4, msg))?,
        created_at: parse_timestamp(&created_at_str, 5)?,
        updated_at: parse_timestamp(&updated_at_str, 6)?,
    })
}

pub(super) fn parse_timestamp(raw: &str, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt_column(index, format!("invalid timestamp {:?}: {}", raw, e)))
}
