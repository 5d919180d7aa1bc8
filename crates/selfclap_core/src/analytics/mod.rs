//! Behavioral analytics engine.
//!
//! # Responsibility
//! - Reduce diary/task history into streaks, data gaps, dashboards and the
//!   reflection report.
//! - Classify single diary bodies into a follow-up mode.
//!
//! # Invariants
//! - Analytics never mutate the record store.
//! - Results are recomputed on every call; nothing is cached.
//! - Any store failure fails the whole computation; no partial results.

pub mod emotion;
pub mod gaps;
pub mod reflection;
pub mod stats;
pub mod streak;

use crate::model::task::TaskId;
use crate::model::ValidationError;
use crate::repo::RepoError;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Identity of a record named in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey {
    Entry(NaiveDate),
    Task(TaskId),
    Unknown,
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry(date) => write!(f, "diary entry {date}"),
            Self::Task(id) => write!(f, "task {id}"),
            Self::Unknown => f.write_str("record"),
        }
    }
}

impl From<&ValidationError> for RecordKey {
    fn from(value: &ValidationError) -> Self {
        match value {
            ValidationError::EmptyEntryContent { date } => Self::Entry(*date),
            ValidationError::DoneTaskMissingCompletionDate { task_id }
            | ValidationError::CompletionDateOnOpenTask { task_id, .. }
            | ValidationError::CompletedBeforeCreated { task_id, .. } => Self::Task(*task_id),
            ValidationError::EmptyTaskTitle { task_id }
            | ValidationError::DifficultyOutOfRange { task_id, .. } => {
                task_id.map_or(Self::Unknown, Self::Task)
            }
        }
    }
}

/// Why a date window could not be formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeError {
    Inverted { start: NaiveDate, end: NaiveDate },
    Underflow { anchor: NaiveDate, days: u32 },
    InvalidMonth { year: i32, month: u32 },
}

impl Display for DateRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverted { start, end } => write!(f, "window start {start} is after end {end}"),
            Self::Underflow { anchor, days } => {
                write!(f, "cannot look back {days} days from {anchor}")
            }
            Self::InvalidMonth { year, month } => write!(f, "invalid month {year}-{month:02}"),
        }
    }
}

/// Analytics failure taxonomy.
#[derive(Debug)]
pub enum AnalyticsError {
    /// The record store failed to answer a query.
    StoreUnavailable(RepoError),
    InvalidDateRange(DateRangeError),
    /// A stored record violates the data model's invariants.
    MalformedRecord { record: RecordKey, reason: String },
    /// A store returned results that break its declared ordering/filter contract.
    StoreContractViolation { query: &'static str, detail: String },
}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "record store unavailable: {err}"),
            Self::InvalidDateRange(err) => write!(f, "invalid date range: {err}"),
            Self::MalformedRecord { record, reason } => {
                write!(f, "malformed {record}: {reason}")
            }
            Self::StoreContractViolation { query, detail } => {
                write!(f, "record store broke `{query}` contract: {detail}")
            }
        }
    }
}

impl Error for AnalyticsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AnalyticsError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::MalformedRecord {
                record: RecordKey::from(&err),
                reason: err.to_string(),
            },
            RepoError::InvalidData(reason) => Self::MalformedRecord {
                record: RecordKey::Unknown,
                reason,
            },
            other => Self::StoreUnavailable(other),
        }
    }
}

impl From<DateRangeError> for AnalyticsError {
    fn from(value: DateRangeError) -> Self {
        Self::InvalidDateRange(value)
    }
}

/// Inclusive calendar window `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering `end - days ..= end`.
    pub fn trailing(end: NaiveDate, days: u32) -> Result<Self, DateRangeError> {
        let start = end
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or(DateRangeError::Underflow { anchor: end, days })?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Fails unless `dates` is non-increasing.
pub(crate) fn ensure_newest_first<I>(query: &'static str, dates: I) -> AnalyticsResult<()>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut previous: Option<NaiveDate> = None;
    for date in dates {
        if let Some(prev) = previous {
            if date > prev {
                return Err(AnalyticsError::StoreContractViolation {
                    query,
                    detail: format!("{date} returned after {prev}; expected newest-first"),
                });
            }
        }
        previous = Some(date);
    }
    Ok(())
}
