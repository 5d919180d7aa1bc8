//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide id-keyed CRUD over the `tasks` table and the done transition.
//!
//! # Invariants
//! - Completed listings are ordered by `completed_date DESC, id DESC`.
//! - Full listings are ordered by `created_date DESC, id DESC`.
//! - Deletion is a hard delete; removed tasks drop out of all aggregation.

use super::{date_to_db, parse_db_date, parse_small_int, RepoError, RepoResult};
use crate::model::task::{NewTask, Task, TaskCompletion, TaskId, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    status,
    priority,
    learnings,
    difficulty_before,
    difficulty_after,
    time_estimated,
    time_actual,
    external_review,
    created_date,
    completed_date
FROM tasks";

/// Repository interface for tasks.
pub trait TaskRepository {
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// All tasks, newest created first.
    fn list_all_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Tasks not yet done, newest created first.
    fn list_active_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Done tasks completed on or after `since`, newest completion first.
    fn list_completed_since(&self, since: NaiveDate) -> RepoResult<Vec<Task>>;
    /// Marks the task done and records completion details.
    fn complete_task(&self, id: TaskId, completion: &TaskCompletion) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_tasks(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                title,
                description,
                status,
                priority,
                time_estimated,
                created_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.title.as_str(),
                task.description.as_deref(),
                TaskStatus::Todo.as_str(),
                task.priority.as_str(),
                task.time_estimated,
                date_to_db(task.created_date),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let tasks = self.query_tasks(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(tasks.into_iter().next())
    }

    fn list_all_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} ORDER BY created_date DESC, id DESC;"),
            [],
        )
    }

    fn list_active_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL} WHERE status != 'done' ORDER BY created_date DESC, id DESC;"
            ),
            [],
        )
    }

    fn list_completed_since(&self, since: NaiveDate) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE status = 'done'
                   AND completed_date >= ?1
                 ORDER BY completed_date DESC, id DESC;"
            ),
            [date_to_db(since)],
        )
    }

    fn complete_task(&self, id: TaskId, completion: &TaskCompletion) -> RepoResult<()> {
        completion.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                status = 'done',
                completed_date = ?2,
                difficulty_before = COALESCE(?3, difficulty_before),
                difficulty_after = COALESCE(?4, difficulty_after),
                learnings = COALESCE(?5, learnings),
                time_actual = COALESCE(?6, time_actual),
                external_review = COALESCE(?7, external_review),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id,
                date_to_db(completion.completed_date),
                completion.difficulty_before,
                completion.difficulty_after,
                completion.learnings.as_deref(),
                completion.time_actual,
                completion.external_review.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;

    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid task status `{status_text}` in tasks.status for task {id}"
        ))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<TaskPriority>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid task priority `{priority_text}` in tasks.priority for task {id}"
        ))
    })?;

    let created_text: String = row.get("created_date")?;
    let completed_date = match row.get::<_, Option<String>>("completed_date")? {
        Some(value) => Some(parse_db_date(&value, "tasks.completed_date")?),
        None => None,
    };

    let task = Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        learnings: row.get("learnings")?,
        difficulty_before: parse_small_int(
            row.get("difficulty_before")?,
            "tasks.difficulty_before",
        )?,
        difficulty_after: parse_small_int(row.get("difficulty_after")?, "tasks.difficulty_after")?,
        time_estimated: row.get("time_estimated")?,
        time_actual: row.get("time_actual")?,
        external_review: row.get("external_review")?,
        created_date: parse_db_date(&created_text, "tasks.created_date")?,
        completed_date,
    };
    task.validate()?;
    Ok(task)
}
