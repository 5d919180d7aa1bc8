//! Domain model for diary entries and tasks.
//!
//! # Responsibility
//! - Define the records the analytics engine reads from the record store.
//! - Own record-level invariants (`validate`) and the enrichment merge rule.
//!
//! # Invariants
//! - A diary entry is identified by its calendar date; at most one per date.
//! - A task is identified by its integer id; completion date is set iff the
//!   task is done.
//! - Blank optional text is equivalent to an absent value.

pub mod diary;
pub mod task;

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

/// Lowest accepted difficulty rating.
pub const DIFFICULTY_MIN: u8 = 1;
/// Highest accepted difficulty rating.
pub const DIFFICULTY_MAX: u8 = 5;

/// Returns the value when it carries non-whitespace text.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Record-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyEntryContent {
        date: NaiveDate,
    },
    EmptyTaskTitle {
        task_id: Option<i64>,
    },
    DoneTaskMissingCompletionDate {
        task_id: i64,
    },
    CompletionDateOnOpenTask {
        task_id: i64,
        completed_date: NaiveDate,
    },
    CompletedBeforeCreated {
        task_id: i64,
        created_date: NaiveDate,
        completed_date: NaiveDate,
    },
    DifficultyOutOfRange {
        task_id: Option<i64>,
        field: &'static str,
        value: u8,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEntryContent { date } => {
                write!(f, "diary entry {date} must have non-empty content")
            }
            Self::EmptyTaskTitle { task_id: Some(id) } => {
                write!(f, "task {id} must have a non-empty title")
            }
            Self::EmptyTaskTitle { task_id: None } => write!(f, "task title must be non-empty"),
            Self::DoneTaskMissingCompletionDate { task_id } => {
                write!(f, "task {task_id} is done but has no completion date")
            }
            Self::CompletionDateOnOpenTask {
                task_id,
                completed_date,
            } => write!(
                f,
                "task {task_id} is not done but has completion date {completed_date}"
            ),
            Self::CompletedBeforeCreated {
                task_id,
                created_date,
                completed_date,
            } => write!(
                f,
                "task {task_id} completed on {completed_date} before its creation on {created_date}"
            ),
            Self::DifficultyOutOfRange {
                task_id,
                field,
                value,
            } => {
                let subject = task_id.map_or_else(|| "task".to_string(), |id| format!("task {id}"));
                write!(
                    f,
                    "{subject} {field} must be within {DIFFICULTY_MIN}..={DIFFICULTY_MAX}, got {value}"
                )
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_difficulty(
    task_id: Option<i64>,
    field: &'static str,
    value: Option<u8>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if !(DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&value) => {
            Err(ValidationError::DifficultyOutOfRange {
                task_id,
                field,
                value,
            })
        }
        _ => Ok(()),
    }
}
