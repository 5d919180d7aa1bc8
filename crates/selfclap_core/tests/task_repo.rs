use chrono::NaiveDate;
use selfclap_core::db::open_db_in_memory;
use selfclap_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use selfclap_core::{NewTask, RepoError, TaskCompletion, TaskPriority, TaskStatus, ValidationError};

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

#[test]
fn create_assigns_ids_and_starts_as_todo() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let mut new_task = NewTask::new("API設計", d(3, 1));
    new_task.priority = TaskPriority::High;
    new_task.time_estimated = Some(2.5);

    let first = repo.create_task(&new_task).unwrap();
    let second = repo.create_task(&NewTask::new("テスト", d(3, 1))).unwrap();
    assert!(second > first);

    let task = repo.get_task(first).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.time_estimated, Some(2.5));
    assert_eq!(task.completed_date, None);
}

#[test]
fn complete_sets_done_and_keeps_it_out_of_active_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let open_id = repo.create_task(&NewTask::new("open", d(3, 1))).unwrap();
    let done_id = repo.create_task(&NewTask::new("done", d(3, 1))).unwrap();

    let completion = TaskCompletion {
        difficulty_before: Some(4),
        difficulty_after: Some(2),
        learnings: Some("分割すると楽".to_string()),
        ..TaskCompletion::on(d(3, 4))
    };
    repo.complete_task(done_id, &completion).unwrap();

    let done = repo.get_task(done_id).unwrap().unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert_eq!(done.completed_date, Some(d(3, 4)));
    assert_eq!(done.difficulty_pair(), Some((4, 2)));

    let active: Vec<_> = repo
        .list_active_tasks()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(active, vec![open_id]);
}

#[test]
fn completed_since_is_newest_completion_first_and_excludes_open_tasks() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let a = repo.create_task(&NewTask::new("a", d(3, 1))).unwrap();
    let b = repo.create_task(&NewTask::new("b", d(3, 1))).unwrap();
    let c = repo.create_task(&NewTask::new("c", d(3, 1))).unwrap();
    repo.create_task(&NewTask::new("open", d(3, 1))).unwrap();

    repo.complete_task(a, &TaskCompletion::on(d(3, 10))).unwrap();
    repo.complete_task(b, &TaskCompletion::on(d(3, 2))).unwrap();
    repo.complete_task(c, &TaskCompletion::on(d(3, 6))).unwrap();

    let ids: Vec<_> = repo
        .list_completed_since(d(3, 5))
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn out_of_range_difficulty_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo.create_task(&NewTask::new("x", d(3, 1))).unwrap();

    let completion = TaskCompletion {
        difficulty_before: Some(6),
        ..TaskCompletion::on(d(3, 2))
    };
    let err = repo.complete_task(id, &completion).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::DifficultyOutOfRange { value: 6, .. })
    ));
    assert_eq!(
        repo.get_task(id).unwrap().unwrap().status,
        TaskStatus::Todo
    );
}

#[test]
fn delete_removes_task_and_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    let id = repo.create_task(&NewTask::new("x", d(3, 1))).unwrap();

    repo.delete_task(id).unwrap();
    assert!(repo.get_task(id).unwrap().is_none());
    assert!(matches!(
        repo.delete_task(id).unwrap_err(),
        RepoError::TaskNotFound(missing) if missing == id
    ));
    assert!(matches!(
        repo.complete_task(id, &TaskCompletion::on(d(3, 2)))
            .unwrap_err(),
        RepoError::TaskNotFound(_)
    ));
}

#[test]
fn done_row_without_completion_date_is_invalid_state() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO tasks (title, status, created_date) VALUES ('broken', 'done', '2026-03-01');",
        [],
    )
    .unwrap();

    let repo = SqliteTaskRepository::new(&conn);
    let err = repo.list_all_tasks().unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::DoneTaskMissingCompletionDate { .. })
    ));
}
