//! Cache-backed facade over [`ApiClient`].
//!
//! Reads go through the query cache: a hit returns without touching the
//! network, a concurrent fetch for the same key is awaited rather than
//! duplicated. Writes call the service first and invalidate the affected
//! entity kind only after it confirms, so a failed write never clears
//! state that is still accurate.

use tokio::sync::Notify;
use uuid::Uuid;

use dayboard_core::{Event, EventRange, Task};

use crate::cache::{QueryCache, QueryState};
use crate::client::{ApiClient, EventCreate, EventUpdate, TaskCreate, TaskUpdate};
use crate::error::ClientError;

/// [`ApiClient`] plus one cache per entity kind.
pub struct CachedApi {
    api: ApiClient,
    tasks: QueryCache<(), Task>,
    events: QueryCache<EventRange, Event>,
    changed: Notify,
}

impl CachedApi {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: QueryCache::new(),
            events: QueryCache::new(),
            changed: Notify::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// All tasks, from cache when fresh.
    pub async fn tasks(&self) -> Result<Vec<Task>, ClientError> {
        loop {
            match self.tasks.state(&()) {
                QueryState::Ready(tasks) => return Ok(tasks),
                QueryState::Empty | QueryState::Failed(_) => {
                    let Some(generation) = self.tasks.begin_fetch(&()) else {
                        continue;
                    };
                    let result = self.api.list_tasks().await;
                    let outcome = match &result {
                        Ok(tasks) => Ok(tasks.clone()),
                        Err(e) => Err(e.to_string()),
                    };
                    self.tasks.complete_fetch(&(), generation, outcome);
                    self.changed.notify_waiters();
                    return result;
                }
                QueryState::Loading => {
                    let notified = self.changed.notified();
                    tokio::pin!(notified);
                    // Register the waiter before re-checking; `notify_waiters`
                    // only reaches enabled waiters, so enabling after the
                    // check could miss a wakeup from a fetch that just
                    // settled.
                    notified.as_mut().enable();
                    if !matches!(self.tasks.state(&()), QueryState::Loading) {
                        continue;
                    }
                    notified.await;
                }
            }
        }
    }

    /// Events overlapping `range`, from cache when fresh. Each distinct
    /// window is cached independently.
    pub async fn events(&self, range: EventRange) -> Result<Vec<Event>, ClientError> {
        loop {
            match self.events.state(&range) {
                QueryState::Ready(events) => return Ok(events),
                QueryState::Empty | QueryState::Failed(_) => {
                    let Some(generation) = self.events.begin_fetch(&range) else {
                        continue;
                    };
                    let result = self.api.list_events(range).await;
                    let outcome = match &result {
                        Ok(events) => Ok(events.clone()),
                        Err(e) => Err(e.to_string()),
                    };
                    self.events.complete_fetch(&range, generation, outcome);
                    self.changed.notify_waiters();
                    return result;
                }
                QueryState::Loading => {
                    let notified = self.changed.notified();
                    tokio::pin!(notified);
                    notified.as_mut().enable();
                    if !matches!(self.events.state(&range), QueryState::Loading) {
                        continue;
                    }
                    notified.await;
                }
            }
        }
    }

    pub async fn create_task(&self, task: &TaskCreate) -> Result<Task, ClientError> {
        let created = self.api.create_task(task).await?;
        self.invalidate_tasks();
        Ok(created)
    }

    pub async fn update_task(&self, id: Uuid, patch: &TaskUpdate) -> Result<Task, ClientError> {
        let updated = self.api.update_task(id, patch).await?;
        self.invalidate_tasks();
        Ok(updated)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_task(id).await?;
        self.invalidate_tasks();
        Ok(())
    }

    pub async fn create_event(&self, event: &EventCreate) -> Result<Event, ClientError> {
        let created = self.api.create_event(event).await?;
        self.invalidate_events();
        Ok(created)
    }

    pub async fn update_event(&self, id: Uuid, patch: &EventUpdate) -> Result<Event, ClientError> {
        let updated = self.api.update_event(id, patch).await?;
        self.invalidate_events();
        Ok(updated)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_event(id).await?;
        self.invalidate_events();
        Ok(())
    }

    fn invalidate_tasks(&self) {
        self.tasks.invalidate_all();
        self.changed.notify_waiters();
    }

    fn invalidate_events(&self) {
        self.events.invalidate_all();
        self.changed.notify_waiters();
    }
}
