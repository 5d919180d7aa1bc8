use chrono::NaiveDate;
use selfclap_core::db::open_db_in_memory;
use selfclap_core::{
    DiaryEntry, DiaryPatch, DiaryService, DiaryServiceError, Mood, NewTask, RecommendedMode,
    SqliteDiaryRepository, SqliteTaskRepository, TaskCompletion, TaskService, TaskServiceError,
    TaskStatus,
};

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

#[test]
fn venting_entry_recommends_listen_and_skips_enrichment_prompt() {
    let conn = open_db_in_memory().unwrap();
    let service = DiaryService::new(SqliteDiaryRepository::new(&conn));

    let outcome = service
        .write_entry(DiaryEntry::new(d(7, 1), "むかつく、むかつく、先輩にまた怒られた"))
        .unwrap();

    assert!(outcome.signal.is_venting);
    assert_eq!(outcome.signal.recommended_mode, RecommendedMode::Listen);
    assert!(!outcome.suggest_enrichment);
    assert_eq!(outcome.entry.date, d(7, 1));
}

#[test]
fn plain_entry_without_growth_fields_suggests_enrichment() {
    let conn = open_db_in_memory().unwrap();
    let service = DiaryService::new(SqliteDiaryRepository::new(&conn));

    let outcome = service
        .write_entry(DiaryEntry::new(d(7, 2), "今日は特に何もなかった"))
        .unwrap();

    assert_eq!(outcome.signal.recommended_mode, RecommendedMode::None);
    assert!(outcome.suggest_enrichment);
}

#[test]
fn second_write_for_date_is_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let service = DiaryService::new(SqliteDiaryRepository::new(&conn));

    service.write_entry(DiaryEntry::new(d(7, 3), "first")).unwrap();
    let err = service
        .write_entry(DiaryEntry::new(d(7, 3), "second"))
        .unwrap_err();
    assert!(matches!(err, DiaryServiceError::DuplicateDate(date) if date == d(7, 3)));
}

#[test]
fn enrichment_fills_only_empty_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = DiaryService::new(SqliteDiaryRepository::new(&conn));

    let mut entry = DiaryEntry::new(d(7, 4), "body");
    entry.learned_today = Some("original".to_string());
    service.write_entry(entry).unwrap();

    let patch = DiaryPatch {
        mood: Some(Mood::Happy),
        learned_today: Some("replacement".to_string()),
        compared_to_past: Some("faster than last week".to_string()),
        self_assessment: Some("  ".to_string()),
        ..DiaryPatch::default()
    };
    let outcome = service.enrich_entry(d(7, 4), &patch).unwrap();

    assert_eq!(outcome.filled, vec!["mood", "compared_to_past"]);
    assert_eq!(outcome.entry.learned_today.as_deref(), Some("original"));
    assert_eq!(outcome.entry.self_assessment, None);

    let stored = service.show_entry(d(7, 4)).unwrap().unwrap();
    assert_eq!(stored, outcome.entry);

    let again = service.enrich_entry(d(7, 4), &patch).unwrap();
    assert!(again.filled.is_empty());
}

#[test]
fn enriching_missing_entry_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = DiaryService::new(SqliteDiaryRepository::new(&conn));

    let err = service
        .enrich_entry(d(7, 5), &DiaryPatch::default())
        .unwrap_err();
    assert!(matches!(err, DiaryServiceError::EntryNotFound(date) if date == d(7, 5)));
}

#[test]
fn task_lifecycle_add_complete_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = service.add_task(&NewTask::new("README", d(7, 1))).unwrap();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(service.list_active().unwrap().len(), 1);

    let completion = TaskCompletion {
        difficulty_before: Some(4),
        difficulty_after: Some(2),
        learnings: Some("見出しを先に決める".to_string()),
        time_actual: Some(1.5),
        ..TaskCompletion::on(d(7, 3))
    };
    let done = service.complete_task(task.id, &completion).unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert_eq!(done.completed_date, Some(d(7, 3)));
    assert_eq!(done.time_actual, Some(1.5));
    assert!(service.list_active().unwrap().is_empty());
    assert_eq!(service.list_all().unwrap().len(), 1);

    let err = service
        .complete_task(task.id, &TaskCompletion::on(d(7, 4)))
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::AlreadyDone(id) if id == task.id));

    service.delete_task(task.id).unwrap();
    assert!(service.get_task(task.id).unwrap().is_none());
    assert!(matches!(
        service.delete_task(task.id).unwrap_err(),
        TaskServiceError::TaskNotFound(_)
    ));
}

#[test]
fn completing_before_creation_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let task = service.add_task(&NewTask::new("later", d(7, 10))).unwrap();
    let err = service
        .complete_task(task.id, &TaskCompletion::on(d(7, 9)))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::CompletedBeforeCreated { task_id, .. } if task_id == task.id
    ));
}
