//! Task model.
//!
//! # Invariants
//! - `completed_date` is set iff `status == TaskStatus::Done`.
//! - Difficulty ratings stay within `DIFFICULTY_MIN..=DIFFICULTY_MAX`.
//! - `Done` is terminal; tasks are never reopened.

use super::{check_difficulty, non_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Integer identity assigned by the store.
pub type TaskId = i64;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown task status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown task priority `{other}`; expected low|medium|high")),
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Meaningful only when done.
    pub learnings: Option<String>,
    /// Perceived difficulty before starting (1-5).
    pub difficulty_before: Option<u8>,
    /// Perceived difficulty after finishing (1-5).
    pub difficulty_after: Option<u8>,
    /// Hours.
    pub time_estimated: Option<f64>,
    /// Hours.
    pub time_actual: Option<f64>,
    pub external_review: Option<String>,
    pub created_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
}

impl Task {
    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTaskTitle {
                task_id: Some(self.id),
            });
        }

        match (self.status, self.completed_date) {
            (TaskStatus::Done, None) => {
                return Err(ValidationError::DoneTaskMissingCompletionDate { task_id: self.id });
            }
            (TaskStatus::Todo | TaskStatus::InProgress, Some(completed_date)) => {
                return Err(ValidationError::CompletionDateOnOpenTask {
                    task_id: self.id,
                    completed_date,
                });
            }
            (TaskStatus::Done, Some(completed_date)) if completed_date < self.created_date => {
                return Err(ValidationError::CompletedBeforeCreated {
                    task_id: self.id,
                    created_date: self.created_date,
                    completed_date,
                });
            }
            _ => {}
        }

        check_difficulty(Some(self.id), "difficulty_before", self.difficulty_before)?;
        check_difficulty(Some(self.id), "difficulty_after", self.difficulty_after)?;
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Both difficulty ratings, when the pair is complete.
    pub fn difficulty_pair(&self) -> Option<(u8, u8)> {
        self.difficulty_before.zip(self.difficulty_after)
    }

    /// Learnings text, if non-blank.
    pub fn learnings_text(&self) -> Option<&str> {
        non_blank(self.learnings.as_deref())
    }
}

/// Input for creating a task. New tasks always start as `todo`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub time_estimated: Option<f64>,
    pub created_date: NaiveDate,
}

impl NewTask {
    pub fn new(title: impl Into<String>, created_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            time_estimated: None,
            created_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTaskTitle { task_id: None });
        }
        Ok(())
    }
}

/// Data recorded when a task transitions to done.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletion {
    pub completed_date: NaiveDate,
    pub difficulty_before: Option<u8>,
    pub difficulty_after: Option<u8>,
    pub learnings: Option<String>,
    pub time_actual: Option<f64>,
    pub external_review: Option<String>,
}

impl TaskCompletion {
    pub fn on(completed_date: NaiveDate) -> Self {
        Self {
            completed_date,
            difficulty_before: None,
            difficulty_after: None,
            learnings: None,
            time_actual: None,
            external_review: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_difficulty(None, "difficulty_before", self.difficulty_before)?;
        check_difficulty(None, "difficulty_after", self.difficulty_after)?;
        Ok(())
    }

    /// Whether any learning-related detail was supplied.
    pub fn has_learning_details(&self) -> bool {
        self.difficulty_before.is_some()
            || self.difficulty_after.is_some()
            || non_blank(self.learnings.as_deref()).is_some()
    }
}
