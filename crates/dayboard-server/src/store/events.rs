//! Event CRUD and range-overlap listing on the SQLite store.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use dayboard_core::{Event, EventPatch, EventRange, NewEvent};

use super::tasks::parse_timestamp;
use super::{corrupt_column, Store, StoreError, StoreResult};

const EVENT_COLUMNS: &str = "id, title, description, start_ms, end_ms, color, created_at, updated_at";

impl Store {
    /// List events overlapping the given window, ordered by start ascending.
    ///
    /// An event qualifies when `end_at >= from` (if `from` given) and
    /// `start_at <= to` (if `to` given); an absent bound constrains nothing.
    pub fn list_events(&self, range: EventRange) -> StoreResult<Vec<Event>> {
        let from_ms = range.from.map(|t| t.timestamp_millis());
        let to_ms = range.to.map(|t| t.timestamp_millis());

        let mut stmt = self
            .conn
            .prepare(&format!(
                r#"
                SELECT {}
                FROM events
                WHERE (?1 IS NULL OR end_ms >= ?1) AND (?2 IS NULL OR start_ms <= ?2)
                ORDER BY start_ms ASC
                "#,
                EVENT_COLUMNS
            ))
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![from_ms, to_ms], row_to_event)
            .map_err(|e| StoreError::storage(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::storage(e.to_string()))
    }

    /// Insert a new event, assigning its id and both timestamps.
    pub fn create_event(&self, new_event: &NewEvent) -> StoreResult<Event> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        self.conn
            .execute(
                r#"
                INSERT INTO events (id, title, description, start_ms, end_ms, color, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    id.to_string(),
                    new_event.title,
                    new_event.description,
                    new_event.start_at.timestamp_millis(),
                    new_event.end_at.timestamp_millis(),
                    new_event.color.as_str(),
                    now_str,
                    now_str,
                ],
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;

        tracing::debug!("Created event {}", id);

        Ok(Event {
            id,
            title: new_event.title.clone(),
            description: new_event.description.clone(),
            start_at: truncate_to_millis(new_event.start_at),
            end_at: truncate_to_millis(new_event.end_at),
            color: new_event.color,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an event by id. Returns `None` if it doesn't exist.
    pub fn get_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS))
            .map_err(|e| StoreError::storage(e.to_string()))?;

        let mut rows = stmt
            .query(params![id.to_string()])
            .map_err(|e| StoreError::storage(e.to_string()))?;

        match rows.next().map_err(|e| StoreError::storage(e.to_string()))? {
            Some(row) => Ok(Some(
                row_to_event(row).map_err(|e| StoreError::storage(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    /// Apply a partial update, refreshing `updated_at`.
    pub fn update_event(&self, id: Uuid, patch: EventPatch) -> StoreResult<Event> {
        let mut event = self.get_event(id)?.ok_or_else(|| StoreError::not_found(id))?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(start_at) = patch.start_at {
            event.start_at = truncate_to_millis(start_at);
        }
        if let Some(end_at) = patch.end_at {
            event.end_at = truncate_to_millis(end_at);
        }
        if let Some(color) = patch.color {
            event.color = color;
        }

        event.updated_at = Utc::now();

        self.conn
            .execute(
                r#"
                UPDATE events
                SET title = ?1, description = ?2, start_ms = ?3, end_ms = ?4, color = ?5, updated_at = ?6
                WHERE id = ?7
                "#,
                params![
                    event.title,
                    event.description,
                    event.start_at.timestamp_millis(),
                    event.end_at.timestamp_millis(),
                    event.color.as_str(),
                    event.updated_at.to_rfc3339(),
                    id.to_string(),
                ],
            )
            .map_err(|e| StoreError::storage(e.to_string()))?;

        tracing::debug!("Updated event {}", id);
        Ok(event)
    }

    /// Delete an event. A second delete of the same id is `NotFound`.
    pub fn delete_event(&self, id: Uuid) -> StoreResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1", params![id.to_string()])
            .map_err(|e| StoreError::storage(e.to_string()))?;

        if deleted == 0 {
            return Err(StoreError::not_found(id));
        }

        tracing::debug!("Deleted event {}", id);
        Ok(())
    }
}

/// Convert a database row to an Event.
fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    let id_str: String = row.get(0)?;
    let start_ms: i64 = row.get(3)?;
    let end_ms: i64 = row.get(4)?;
    let color_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;
    let updated_at_str: String = row.get(7)?;

    Ok(Event {
        id: Uuid::parse_str(&id_str).map_err(|e| corrupt_column(0, e))?,
        title: row.get(1)?,
        description: row.get(2)?,
        start_at: DateTime::from_timestamp_millis(start_ms)
            .ok_or_else(|| corrupt_column(3, format!("millis out of range: {}", start_ms)))?,
        end_at: DateTime::from_timestamp_millis(end_ms)
            .ok_or_else(|| corrupt_column(4, format!("millis out of range: {}", end_ms)))?,
        color: color_str.parse().map_err(|msg: String| corrupt_column(5, msg))?,
        created_at: parse_timestamp(&created_at_str, 6)?,
        updated_at: parse_timestamp(&updated_at_str, 7)?,
    })
}

/// Event bounds are persisted at millisecond precision; reflect that in
/// returned rows so a created row equals its later re-read.
fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use dayboard_core::EventColor;

    fn test_store() -> Store {
        Store::in_memory().expect("Failed to create in-memory store")
    }

    fn instant(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    fn morning_meeting() -> NewEvent {
        NewEvent {
            title: "Morning meeting".to_string(),
            description: None,
            start_at: instant("2025-03-01T09:00:00Z"),
            end_at: instant("2025-03-01T10:00:00Z"),
            color: EventColor::Blue,
        }
    }

    fn window(from: Option<&str>, to: Option<&str>) -> EventRange {
        EventRange {
            from: from.map(instant),
            to: to.map(instant),
        }
    }

    #[test]
    fn create_then_reread_round_trips() {
        let store = test_store();

        let event = store.create_event(&morning_meeting()).unwrap();
        let stored = store.get_event(event.id).unwrap().unwrap();
        assert_eq!(stored, event);
        assert_eq!(stored.color, EventColor::Blue);
    }

    #[test]
    fn overlap_includes_event_inside_window() {
        let store = test_store();
        store.create_event(&morning_meeting()).unwrap();

        let events = store
            .list_events(window(Some("2025-03-01T08:00:00Z"), Some("2025-03-01T11:00:00Z")))
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn overlap_includes_event_straddling_from_bound() {
        let store = test_store();
        store.create_event(&morning_meeting()).unwrap();

        // from falls inside the event; no upper bound
        let events = store.list_events(window(Some("2025-03-01T09:30:00Z"), None)).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn overlap_excludes_event_ending_before_window() {
        let store = test_store();
        store.create_event(&morning_meeting()).unwrap();

        let events = store.list_events(window(Some("2025-03-01T11:00:00Z"), None)).unwrap();
        assert!(events.is_empty());

        let events = store.list_events(window(None, Some("2025-03-01T08:00:00Z"))).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn unbounded_range_lists_everything_by_start() {
        let store = test_store();

        let later = NewEvent {
            title: "Lunch".to_string(),
            start_at: instant("2025-03-01T12:00:00Z"),
            end_at: instant("2025-03-01T13:00:00Z"),
            ..morning_meeting()
        };
        store.create_event(&later).unwrap();
        store.create_event(&morning_meeting()).unwrap();

        let events = store.list_events(EventRange::default()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Morning meeting");
        assert_eq!(events[1].title, "Lunch");
    }

    #[test]
    fn update_moves_event_between_windows() {
        let store = test_store();

        let event = store.create_event(&morning_meeting()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let patch = EventPatch {
            start_at: Some(instant("2025-03-02T09:00:00Z")),
            end_at: Some(instant("2025-03-02T10:00:00Z")),
            color: Some(EventColor::Rose),
            ..EventPatch::default()
        };
        let updated = store.update_event(event.id, patch).unwrap();

        assert_eq!(updated.title, "Morning meeting");
        assert_eq!(updated.color, EventColor::Rose);
        assert!(updated.updated_at > event.updated_at);

        let old_day = store
            .list_events(window(Some("2025-03-01T00:00:00Z"), Some("2025-03-01T23:59:59Z")))
            .unwrap();
        assert!(old_day.is_empty());

        let new_day = store
            .list_events(window(Some("2025-03-02T00:00:00Z"), Some("2025-03-02T23:59:59Z")))
            .unwrap();
        assert_eq!(new_day.len(), 1);
    }

    #[test]
    fn update_missing_event_is_not_found() {
        let store = test_store();
        let result = store.update_event(Uuid::new_v4(), EventPatch::default());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn corrupt_color_surfaces_as_storage_error() {
        let store = test_store();
        store
            .conn
            .execute(
                r#"
                INSERT INTO events (id, title, description, start_ms, end_ms, color, created_at, updated_at)
                VALUES (?1, 'Broken', NULL, 0, 1000, 'red', ?2, ?2)
                "#,
                rusqlite::params![Uuid::new_v4().to_string(), Utc::now().to_rfc3339()],
            )
            .unwrap();

        assert!(matches!(
            store.list_events(EventRange::default()),
            Err(StoreError::Storage(_))
        ));
    }

    #[test]
    fn delete_twice_is_not_found() {
        let store = test_store();

        let event = store.create_event(&morning_meeting()).unwrap();
        store.delete_event(event.id).unwrap();
        assert!(matches!(store.delete_event(event.id), Err(StoreError::NotFound(_))));
    }
}
