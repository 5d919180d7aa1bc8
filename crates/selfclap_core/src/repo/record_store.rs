//! Read-side record store contract consumed by the analytics engine.
//!
//! # Responsibility
//! - Expose the five queries the analytics engine depends on.
//! - Pin down result ordering as part of the contract.
//!
//! # Invariants
//! - `entries_since` and `all_entries` return entries newest-first.
//! - `tasks_completed_since` returns only done tasks, newest completion first.
//! - Implementations never mutate state from these calls.

use super::diary_repo::{DiaryRepository, SqliteDiaryRepository};
use super::task_repo::{SqliteTaskRepository, TaskRepository};
use super::RepoResult;
use crate::model::diary::DiaryEntry;
use crate::model::task::Task;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Query contract between the analytics engine and persistent storage.
pub trait RecordStore {
    /// Entries dated on or after `since`, newest first.
    fn entries_since(&self, since: NaiveDate) -> RepoResult<Vec<DiaryEntry>>;
    fn entry_by_date(&self, date: NaiveDate) -> RepoResult<Option<DiaryEntry>>;
    /// Every entry, newest first.
    fn all_entries(&self) -> RepoResult<Vec<DiaryEntry>>;
    /// Done tasks completed on or after `since`, newest completion first.
    fn tasks_completed_since(&self, since: NaiveDate) -> RepoResult<Vec<Task>>;
    fn all_tasks(&self) -> RepoResult<Vec<Task>>;
}

/// `RecordStore` over one SQLite connection.
pub struct SqliteRecordStore<'conn> {
    diary: SqliteDiaryRepository<'conn>,
    tasks: SqliteTaskRepository<'conn>,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            diary: SqliteDiaryRepository::new(conn),
            tasks: SqliteTaskRepository::new(conn),
        }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn entries_since(&self, since: NaiveDate) -> RepoResult<Vec<DiaryEntry>> {
        self.diary.list_entries_since(since)
    }

    fn entry_by_date(&self, date: NaiveDate) -> RepoResult<Option<DiaryEntry>> {
        self.diary.get_entry(date)
    }

    fn all_entries(&self) -> RepoResult<Vec<DiaryEntry>> {
        self.diary.list_all_entries()
    }

    fn tasks_completed_since(&self, since: NaiveDate) -> RepoResult<Vec<Task>> {
        self.tasks.list_completed_since(since)
    }

    fn all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.tasks.list_all_tasks()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn entries_since(&self, since: NaiveDate) -> RepoResult<Vec<DiaryEntry>> {
        (**self).entries_since(since)
    }

    fn entry_by_date(&self, date: NaiveDate) -> RepoResult<Option<DiaryEntry>> {
        (**self).entry_by_date(date)
    }

    fn all_entries(&self) -> RepoResult<Vec<DiaryEntry>> {
        (**self).all_entries()
    }

    fn tasks_completed_since(&self, since: NaiveDate) -> RepoResult<Vec<Task>> {
        (**self).tasks_completed_since(since)
    }

    fn all_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).all_tasks()
    }
}
