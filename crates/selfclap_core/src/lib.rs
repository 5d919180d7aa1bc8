//! Core domain logic for selfclap, a growth diary and task journal.
//! This crate owns persistence, business invariants and the reflection
//! analytics; front-ends only parse input and render output.

pub mod analytics;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::emotion::{EmotionClassifier, EmotionSignal, RecommendedMode};
pub use analytics::gaps::{GapDetector, GapReport, GapThresholds};
pub use analytics::reflection::{ReflectionAggregator, ReflectionReport, ReflectionSettings};
pub use analytics::stats::{build_dashboard, DashboardStats};
pub use analytics::streak::{calendar_summary, CalendarSummary};
pub use analytics::{AnalyticsError, AnalyticsResult};
pub use config::{AnalyticsConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, log_dir_for, logging_status};
pub use model::diary::{DiaryEntry, DiaryPatch, Mood};
pub use model::task::{NewTask, Task, TaskCompletion, TaskId, TaskPriority, TaskStatus};
pub use model::ValidationError;
pub use repo::diary_repo::{DiaryRepository, SqliteDiaryRepository};
pub use repo::record_store::{RecordStore, SqliteRecordStore};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::diary_service::{DiaryService, DiaryServiceError};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
