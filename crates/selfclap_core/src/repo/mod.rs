//! Repository layer: record store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for entries and tasks.
//! - Isolate SQLite query details from services and analytics.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Date-keyed listings are ordered newest-first.

pub mod diary_repo;
pub mod record_store;
pub mod task_repo;

use crate::db::DbError;
use crate::model::task::TaskId;
use crate::model::ValidationError;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage date format for `TEXT` date columns.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry/task persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    EntryNotFound(NaiveDate),
    TaskNotFound(TaskId),
    DuplicateEntryDate(NaiveDate),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::EntryNotFound(date) => write!(f, "diary entry not found: {date}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateEntryDate(date) => {
                write!(f, "diary entry for {date} already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::EntryNotFound(_)
            | Self::TaskNotFound(_)
            | Self::DuplicateEntryDate(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_db_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn parse_small_int(value: Option<i64>, column: &str) -> RepoResult<Option<u8>> {
    value
        .map(|raw| {
            u8::try_from(raw).map_err(|_| {
                RepoError::InvalidData(format!("out-of-range integer `{raw}` in {column}"))
            })
        })
        .transpose()
}
