use chrono::NaiveDate;
use selfclap_core::analytics::DateRangeError;
use selfclap_core::db::open_db_in_memory;
use selfclap_core::repo::diary_repo::DiaryRepository;
use selfclap_core::repo::task_repo::TaskRepository;
use selfclap_core::{
    build_dashboard, calendar_summary, AnalyticsError, DiaryEntry, Mood, NewTask,
    SqliteDiaryRepository, SqliteRecordStore, SqliteTaskRepository, TaskCompletion,
};

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

fn seed_entry(repo: &SqliteDiaryRepository<'_>, date: NaiveDate, mood: Mood, learned: bool) {
    let mut entry = DiaryEntry::new(date, "body");
    entry.mood = Some(mood);
    if learned {
        entry.learned_today = Some("something".to_string());
    }
    repo.create_entry(&entry).unwrap();
}

fn complete(repo: &SqliteTaskRepository<'_>, on: NaiveDate, before: u8, after: u8) {
    let id = repo.create_task(&NewTask::new("t", d(1, 1))).unwrap();
    let completion = TaskCompletion {
        difficulty_before: Some(before),
        difficulty_after: Some(after),
        ..TaskCompletion::on(on)
    };
    repo.complete_task(id, &completion).unwrap();
}

#[test]
fn dashboard_averages_signed_changes_and_lists_them_largest_first() {
    let conn = open_db_in_memory().unwrap();
    let diary = SqliteDiaryRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);

    seed_entry(&diary, d(6, 14), Mood::Tired, true);
    seed_entry(&diary, d(6, 12), Mood::Happy, false);
    seed_entry(&diary, d(6, 10), Mood::Tired, false);
    seed_entry(&diary, d(4, 1), Mood::Anxious, true);

    complete(&tasks, d(6, 13), 4, 2);
    complete(&tasks, d(6, 11), 2, 4);
    complete(&tasks, d(6, 9), 3, 3);
    complete(&tasks, d(3, 1), 5, 1);

    let store = SqliteRecordStore::new(&conn);
    let stats = build_dashboard(&store, d(6, 15), 10).unwrap();

    assert_eq!(stats.period.start, d(6, 5));
    assert_eq!(stats.entry_count, 3);
    assert_eq!(stats.tasks_completed, 3);
    assert_eq!(stats.days_with_entries, 3);
    assert!((stats.continuation_rate.unwrap() - 30.0).abs() < 1e-9);

    assert_eq!(stats.mood_distribution[0].mood, Mood::Tired);
    assert_eq!(stats.mood_distribution[0].count, 2);

    let changes: Vec<_> = stats
        .difficulty_changes
        .iter()
        .map(|c| c.improvement)
        .collect();
    assert_eq!(changes, vec![2, 0, -2]);
    assert!(stats.average_improvement.unwrap().abs() < 1e-9);

    assert_eq!(stats.growth_fill.learned_today.count, 1);
    // 1 of 9 growth slots filled.
    assert!(stats.low_growth_advice);
}

#[test]
fn dashboard_for_empty_period_has_no_rates() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);

    let stats = build_dashboard(&store, d(6, 15), 30).unwrap();
    assert_eq!(stats.entry_count, 0);
    assert_eq!(stats.continuation_rate, None);
    assert_eq!(stats.average_improvement, None);
    assert!(stats.mood_distribution.is_empty());
    assert!(!stats.low_growth_advice);

    let value = serde_json::to_value(&stats).unwrap();
    assert!(value["continuation_rate"].is_null());
}

#[test]
fn calendar_summary_reports_streaks_and_coverage() {
    let conn = open_db_in_memory().unwrap();
    let diary = SqliteDiaryRepository::new(&conn);

    for day in [1, 2, 3, 4, 10, 14, 15] {
        seed_entry(&diary, d(6, day), Mood::Neutral, false);
    }
    seed_entry(&diary, d(5, 31), Mood::Neutral, false);

    let store = SqliteRecordStore::new(&conn);
    let summary = calendar_summary(&store, d(6, 15), 2026, 6).unwrap();

    assert_eq!(summary.current_streak, 2);
    assert_eq!(summary.max_streak, 5);
    assert_eq!(summary.total_entry_days, 8);
    assert!(summary.has_entry_today);
    assert_eq!(summary.coverage.days_in_month, 30);
    assert_eq!(summary.coverage.days_with_entries, 7);
    assert!((summary.coverage.ratio_percent - 70.0 / 3.0).abs() < 1e-9);
}

#[test]
fn calendar_summary_rejects_invalid_month() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);

    let err = calendar_summary(&store, d(6, 15), 2026, 13).unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::InvalidDateRange(DateRangeError::InvalidMonth {
            year: 2026,
            month: 13
        })
    ));
}
