//! Calendar event entity, wire payloads, and validation.
//!
//! Events are time-ranged: `start_at`/`end_at` arrive as RFC 3339 strings
//! and are parsed here, at the validation boundary. A malformed timestamp is
//! a validation error, never a store error. `end_at >= start_at` is not
//! enforced (see DESIGN.md).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::patch::double_option;
use crate::task::{check_description, check_title};

/// Display color, drawn from a fixed palette.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Purple,
    Rose,
    Amber,
    Emerald,
    Cyan,
}

impl EventColor {
    pub fn as_str(self) -> &'static str {
        match self {
            EventColor::Blue => "blue",
            EventColor::Purple => "purple",
            EventColor::Rose => "rose",
            EventColor::Amber => "amber",
            EventColor::Emerald => "emerald",
            EventColor::Cyan => "cyan",
        }
    }
}

impl std::str::FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(EventColor::Blue),
            "purple" => Ok(EventColor::Purple),
            "rose" => Ok(EventColor::Rose),
            "amber" => Ok(EventColor::Amber),
            "emerald" => Ok(EventColor::Emerald),
            "cyan" => Ok(EventColor::Cyan),
            other => Err(format!(
                "Unknown color: {} (expected blue, purple, rose, amber, emerald or cyan)",
                other
            )),
        }
    }
}

impl std::fmt::Display for EventColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored event as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub color: EventColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `POST /events` body. Required fields are optional here so their
/// absence surfaces as violations alongside the rest, not as a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Validated fields for an event about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub color: EventColor,
}

impl CreateEventRequest {
    /// Normalize into a [`NewEvent`], collecting every violation. Omitted
    /// `color` defaults to `blue`; unknown colors never reach the store.
    pub fn validate(self) -> Result<NewEvent, ValidationError> {
        let mut errors = ValidationError::new();

        check_title(self.title.as_deref(), &mut errors);
        check_description(self.description.as_deref(), &mut errors);

        let start_at = require_instant(self.start_at.as_deref(), "startAt", &mut errors);
        let end_at = require_instant(self.end_at.as_deref(), "endAt", &mut errors);

        let color = match self.color.as_deref() {
            None => EventColor::default(),
            Some(raw) => match raw.parse() {
                Ok(c) => c,
                Err(msg) => {
                    errors.add("color", msg);
                    EventColor::default()
                }
            },
        };

        match (self.title, start_at, end_at) {
            (Some(title), Some(start_at), Some(end_at)) if errors.is_empty() => Ok(NewEvent {
                title,
                description: self.description,
                start_at,
                end_at,
                color,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw `PATCH /events/{id}` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Validated partial update for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub color: Option<EventColor>,
}

impl UpdateEventRequest {
    /// Normalize into an [`EventPatch`], collecting every violation.
    pub fn validate(self) -> Result<EventPatch, ValidationError> {
        let mut errors = ValidationError::new();

        if self.title.is_some() {
            check_title(self.title.as_deref(), &mut errors);
        }
        if let Some(Some(ref description)) = self.description {
            check_description(Some(description), &mut errors);
        }

        let start_at = self
            .start_at
            .as_deref()
            .and_then(|raw| parse_instant(raw, "startAt", &mut errors));
        let end_at = self
            .end_at
            .as_deref()
            .and_then(|raw| parse_instant(raw, "endAt", &mut errors));
        let color = crate::task::parse_present(self.color.as_deref(), "color", &mut errors);

        errors.into_result(EventPatch {
            title: self.title,
            description: self.description,
            start_at,
            end_at,
            color,
        })
    }
}

/// Raw `GET /events` query string, both bounds independently optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventRangeQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Validated query window. An event qualifies when its `[start_at, end_at]`
/// interval overlaps the window; an absent bound constrains nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl EventRangeQuery {
    /// Parse both bounds, collecting a violation per malformed bound.
    pub fn validate(self) -> Result<EventRange, ValidationError> {
        let mut errors = ValidationError::new();

        let from = self
            .from
            .as_deref()
            .and_then(|raw| parse_instant(raw, "from", &mut errors));
        let to = self
            .to
            .as_deref()
            .and_then(|raw| parse_instant(raw, "to", &mut errors));

        errors.into_result(EventRange { from, to })
    }
}

/// Parse a required RFC 3339 instant, recording a violation under `field`
/// when absent or malformed.
fn require_instant(
    raw: Option<&str>,
    field: &str,
    errors: &mut ValidationError,
) -> Option<DateTime<Utc>> {
    match raw {
        None => {
            errors.add(field, format!("{} is required", field));
            None
        }
        Some(raw) => parse_instant(raw, field, errors),
    }
}

/// Parse an RFC 3339 instant, recording a violation under `field` on
/// failure.
fn parse_instant(
    raw: &str,
    field: &str,
    errors: &mut ValidationError,
) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            errors.add(field, format!("Invalid timestamp: {}", e));
            None
        }
    }
}
