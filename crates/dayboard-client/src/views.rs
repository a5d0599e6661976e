//! Pure view derivations over cached lists.
//!
//! Nothing here talks to the network; these functions reshape what
//! [`CachedApi`](crate::CachedApi) returns into the structures a calendar
//! or board UI renders directly.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate, TimeZone};

use dayboard_core::{Event, EventColor, Task, TaskStatus};

/// Events starting on one calendar day, plus the palette of colors present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySchedule {
    pub events: Vec<Event>,
    pub colors: BTreeSet<EventColor>,
}

/// Group events by the calendar day their start falls on in `tz`. Within a
/// day, input order is preserved; the service already returns events sorted
/// by start time.
pub fn events_by_day<Tz: TimeZone>(events: &[Event], tz: &Tz) -> BTreeMap<NaiveDate, DaySchedule> {
    let mut days: BTreeMap<NaiveDate, DaySchedule> = BTreeMap::new();
    for event in events {
        let day = event.start_at.with_timezone(tz).date_naive();
        let schedule = days.entry(day).or_default();
        schedule.colors.insert(event.color);
        schedule.events.push(event.clone());
    }
    days
}

/// The calendar day it currently is in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Tasks bucketed by status, in their incoming (creation) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

pub fn board(tasks: &[Task]) -> TaskBoard {
    let mut board = TaskBoard::default();
    for task in tasks {
        let bucket = match task.status {
            TaskStatus::Todo => &mut board.todo,
            TaskStatus::InProgress => &mut board.in_progress,
            TaskStatus::Done => &mut board.done,
        };
        bucket.push(task.clone());
    }
    board
}

/// Completion summary for a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// `completed / total`, rounded to the nearest whole percent. Zero for
    /// an empty list.
    pub percent_done: u8,
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count();
    let percent_done = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    };
    TaskStats {
        total,
        completed,
        percent_done,
    }
}
