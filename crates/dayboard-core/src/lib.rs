pub mod config;
pub mod error;
pub mod event;
pub mod patch;
pub mod task;

pub use config::{ClientConfig, Config, ServerConfig};
pub use error::{AppError, FieldViolation, ValidationError};
pub use event::{
    CreateEventRequest, Event, EventColor, EventPatch, EventRange, EventRangeQuery, NewEvent,
    UpdateEventRequest,
};
pub use task::{
    CreateTaskRequest, NewTask, Task, TaskPatch, TaskPriority, TaskStatus, UpdateTaskRequest,
};

use anyhow::Result;

/// Maximum title length for tasks and events.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum description length for tasks and events.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Initialize tracing for a Dayboard binary.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Dayboard core initialized");
    Ok(())
}
