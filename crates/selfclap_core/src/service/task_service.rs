//! Task use-case service.
//!
//! # Invariants
//! - New tasks start as `todo`.
//! - `done` is terminal; completing a done task is rejected.
//! - A task cannot be completed before the day it was created.

use crate::model::task::{NewTask, Task, TaskCompletion, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TaskServiceError {
    TaskNotFound(TaskId),
    AlreadyDone(TaskId),
    CompletedBeforeCreated {
        task_id: TaskId,
        created_date: NaiveDate,
        completed_date: NaiveDate,
    },
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::AlreadyDone(id) => write!(f, "task {id} is already done"),
            Self::CompletedBeforeCreated {
                task_id,
                created_date,
                completed_date,
            } => write!(
                f,
                "task {task_id} was created on {created_date}; cannot complete it on {completed_date}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_task(&self, task: &NewTask) -> Result<Task, TaskServiceError> {
        let id = self.repo.create_task(task)?;
        info!("event=task_add module=service status=ok task_id={id}");
        self.read_back(id, "created task not found in read-back")
    }

    /// Moves a task to done and records completion details.
    pub fn complete_task(
        &self,
        id: TaskId,
        completion: &TaskCompletion,
    ) -> Result<Task, TaskServiceError> {
        let task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        if task.is_done() {
            return Err(TaskServiceError::AlreadyDone(id));
        }
        if completion.completed_date < task.created_date {
            return Err(TaskServiceError::CompletedBeforeCreated {
                task_id: id,
                created_date: task.created_date,
                completed_date: completion.completed_date,
            });
        }

        self.repo.complete_task(id, completion)?;
        info!(
            "event=task_complete module=service status=ok task_id={} has_difficulty={} has_learnings={}",
            id,
            completion.difficulty_before.is_some() && completion.difficulty_after.is_some(),
            completion.learnings.is_some()
        );
        self.read_back(id, "completed task not found in read-back")
    }

    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    pub fn list_active(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_active_tasks()
    }

    pub fn list_all(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_all_tasks()
    }

    fn read_back(&self, id: TaskId, context: &'static str) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(context))
    }
}
