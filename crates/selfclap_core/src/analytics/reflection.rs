//! Reflection report aggregation.
//!
//! # Responsibility
//! - Query the record store across the recent, growth and all-time windows.
//! - Merge streak and gap output into one serializable [`ReflectionReport`].
//!
//! # Invariants
//! - Read-only: the store is never mutated.
//! - "Recent N" means the first N items in the store's newest-first order.
//! - Every count in the report equals the length of the list it counts.
//! - A failing query fails the whole report.

use super::gaps::{GapDetector, GapReport, GapThresholds};
use super::streak::current_streak;
use super::{ensure_newest_first, AnalyticsError, AnalyticsResult, DateWindow, RecordKey};
use crate::model::diary::{DiaryEntry, Mood};
use crate::model::non_blank;
use crate::model::task::{Task, TaskId};
use crate::repo::record_store::RecordStore;
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

/// Windowing and slicing parameters for the reflection report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionSettings {
    /// Days covered by the current-state and evaluation-axis sections.
    pub recent_window_days: u32,
    /// Days of completed tasks used for difficulty, learnings and task gaps.
    pub growth_window_days: u32,
    /// Items kept in each "recent" list.
    pub recent_items_limit: usize,
    /// Maximum difficulty improvements listed.
    pub improvement_limit: usize,
    /// Substrings that mark external feedback as recognition.
    pub affirming_markers: Vec<String>,
}

impl Default for ReflectionSettings {
    fn default() -> Self {
        Self {
            recent_window_days: 7,
            growth_window_days: 30,
            recent_items_limit: 5,
            improvement_limit: 5,
            affirming_markers: vec!["良い".to_string(), "素晴らしい".to_string()],
        }
    }
}

/// Difficulty change for one completed task with both ratings set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyImprovement {
    pub task_id: TaskId,
    pub task: String,
    pub before: u8,
    pub after: u8,
    /// `before - after`; positive means the task felt easier at the end.
    pub improvement: i32,
}

impl DifficultyImprovement {
    pub fn from_task(task: &Task) -> Option<Self> {
        let (before, after) = task.difficulty_pair()?;
        Some(Self {
            task_id: task.id,
            task: task.title.clone(),
            before,
            after,
            improvement: i32::from(before) - i32::from(after),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    pub recent_moods: Vec<Mood>,
    pub recent_tasks_completed: usize,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalVsInternal {
    pub external_feedback: Vec<String>,
    pub self_assessment: Vec<String>,
    pub learned_count: usize,
    pub compared_count: usize,
    pub invisible_growth_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleGrowth {
    pub external_recognition: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvisibleGrowth {
    pub learned_items: Vec<String>,
    pub compared_items: Vec<String>,
    pub invisible_growth: Vec<String>,
    pub difficulty_improvements: Vec<DifficultyImprovement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthBreakdown {
    pub visible: VisibleGrowth,
    pub invisible: InvisibleGrowth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningAccumulation {
    pub total_diary_learnings: usize,
    pub total_task_learnings: usize,
    /// Recent diary learnings followed by recent task learnings.
    pub recent_learnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastComparison {
    pub total_entries: usize,
    pub total_tasks_completed: usize,
    pub comparison_records: Vec<String>,
}

/// Snapshot of growth signals consumed by presentation and prompt layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionReport {
    pub current_state: CurrentState,
    pub external_vs_internal: ExternalVsInternal,
    pub visible_vs_invisible_growth: GrowthBreakdown,
    pub learning_accumulation: LearningAccumulation,
    pub past_comparison: PastComparison,
    pub data_gaps: GapReport,
}

/// Builds [`ReflectionReport`]s from a record store.
pub struct ReflectionAggregator<S: RecordStore> {
    store: S,
    settings: ReflectionSettings,
    gap_detector: GapDetector,
}

impl<S: RecordStore> ReflectionAggregator<S> {
    /// Aggregator with default settings and thresholds.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ReflectionSettings::default(), GapThresholds::default())
    }

    pub fn with_config(store: S, settings: ReflectionSettings, thresholds: GapThresholds) -> Self {
        Self {
            store,
            settings,
            gap_detector: GapDetector::new(thresholds),
        }
    }

    /// Builds a fresh report anchored at `now`.
    ///
    /// # Errors
    /// - `StoreUnavailable` when any store query fails.
    /// - `MalformedRecord` when a returned record breaks model invariants.
    /// - `StoreContractViolation` when results are not newest-first or a
    ///   completed-task query returns an unfinished task.
    /// - `InvalidDateRange` when a window cannot be formed around `now`.
    pub fn build_report(&self, now: NaiveDate) -> AnalyticsResult<ReflectionReport> {
        let started_at = Instant::now();
        match self.collect(now) {
            Ok(report) => {
                info!(
                    "event=reflection_build module=analytics status=ok duration_ms={} total_entries={} streak={} gaps={}",
                    started_at.elapsed().as_millis(),
                    report.past_comparison.total_entries,
                    report.current_state.streak,
                    report.data_gaps.missing_fields.len()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=reflection_build module=analytics status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn collect(&self, now: NaiveDate) -> AnalyticsResult<ReflectionReport> {
        let limit = self.settings.recent_items_limit;
        let recent_window = DateWindow::trailing(now, self.settings.recent_window_days)?;
        let growth_window = DateWindow::trailing(now, self.settings.growth_window_days)?;

        let recent_entries = self.entries_since(recent_window.start)?;
        let recent_moods: Vec<Mood> = recent_entries.iter().filter_map(|e| e.mood).collect();
        let recent_completed = self.completed_since(recent_window.start)?;

        let external_feedback = texts(&recent_entries, |e| e.external_feedback.as_deref());
        let self_assessment = texts(&recent_entries, |e| e.self_assessment.as_deref());

        let all_entries = self.store.all_entries()?;
        ensure_newest_first("all_entries", all_entries.iter().map(|e| e.date))?;
        let learned_items = texts(&all_entries, |e| e.learned_today.as_deref());
        let compared_items = texts(&all_entries, |e| e.compared_to_past.as_deref());
        let invisible_items = texts(&all_entries, |e| e.invisible_growth.as_deref());

        let growth_completed = self.completed_since(growth_window.start)?;
        let mut improvements: Vec<DifficultyImprovement> = growth_completed
            .iter()
            .filter_map(DifficultyImprovement::from_task)
            .filter(|item| item.improvement > 0)
            .collect();
        // Stable sort keeps store order among equal improvements.
        improvements.sort_by(|a, b| b.improvement.cmp(&a.improvement));
        improvements.truncate(self.settings.improvement_limit);

        let task_learnings: Vec<String> = growth_completed
            .iter()
            .filter_map(|task| task.learnings_text().map(str::to_string))
            .collect();

        let data_gaps = self
            .gap_detector
            .detect_gaps(&all_entries, &growth_completed);

        let external_recognition = external_feedback
            .iter()
            .filter(|feedback| {
                self.settings
                    .affirming_markers
                    .iter()
                    .any(|marker| feedback.contains(marker.as_str()))
            })
            .count();

        let entry_dates: BTreeSet<NaiveDate> = all_entries.iter().map(|e| e.date).collect();
        let streak = current_streak(&entry_dates, now);

        let total_tasks_completed = self
            .store
            .all_tasks()?
            .iter()
            .filter(|task| task.is_done())
            .count();

        let recent_learnings = first_n(&learned_items, limit)
            .into_iter()
            .chain(first_n(&task_learnings, limit))
            .collect();

        Ok(ReflectionReport {
            current_state: CurrentState {
                recent_moods,
                recent_tasks_completed: recent_completed.len(),
                streak,
            },
            external_vs_internal: ExternalVsInternal {
                learned_count: learned_items.len(),
                compared_count: compared_items.len(),
                invisible_growth_count: invisible_items.len(),
                external_feedback,
                self_assessment,
            },
            visible_vs_invisible_growth: GrowthBreakdown {
                visible: VisibleGrowth {
                    external_recognition,
                },
                invisible: InvisibleGrowth {
                    learned_items: first_n(&learned_items, limit),
                    compared_items: first_n(&compared_items, limit),
                    invisible_growth: first_n(&invisible_items, limit),
                    difficulty_improvements: improvements,
                },
            },
            learning_accumulation: LearningAccumulation {
                total_diary_learnings: learned_items.len(),
                total_task_learnings: task_learnings.len(),
                recent_learnings,
            },
            past_comparison: PastComparison {
                total_entries: all_entries.len(),
                total_tasks_completed,
                comparison_records: first_n(&compared_items, limit),
            },
            data_gaps,
        })
    }

    fn entries_since(&self, since: NaiveDate) -> AnalyticsResult<Vec<DiaryEntry>> {
        let entries = self.store.entries_since(since)?;
        ensure_newest_first("entries_since", entries.iter().map(|e| e.date))?;
        Ok(entries)
    }

    fn completed_since(&self, since: NaiveDate) -> AnalyticsResult<Vec<Task>> {
        let tasks = self.store.tasks_completed_since(since)?;
        let mut completion_dates = Vec::with_capacity(tasks.len());
        for task in &tasks {
            match (task.is_done(), task.completed_date) {
                (true, Some(date)) => completion_dates.push(date),
                (true, None) => {
                    return Err(AnalyticsError::MalformedRecord {
                        record: RecordKey::Task(task.id),
                        reason: "done task has no completion date".to_string(),
                    });
                }
                (false, _) => {
                    return Err(AnalyticsError::StoreContractViolation {
                        query: "tasks_completed_since",
                        detail: format!("task {} is not done", task.id),
                    });
                }
            }
        }
        ensure_newest_first("tasks_completed_since", completion_dates)?;
        Ok(tasks)
    }
}

fn texts<F>(entries: &[DiaryEntry], field: F) -> Vec<String>
where
    F: Fn(&DiaryEntry) -> Option<&str>,
{
    entries
        .iter()
        .filter_map(|entry| non_blank(field(entry)).map(str::to_string))
        .collect()
}

fn first_n(items: &[String], n: usize) -> Vec<String> {
    items.iter().take(n).cloned().collect()
}
