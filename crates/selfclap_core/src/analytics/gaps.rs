//! Data-gap detection over entry/task history.
//!
//! # Invariants
//! - Checks run independently and append in a fixed order.
//! - With no entries, entry ratio checks never fire.
//! - Only done tasks are inspected for task gaps.

use crate::model::diary::DiaryEntry;
use crate::model::non_blank;
use crate::model::task::Task;
use serde::{Deserialize, Serialize};

/// Ratio thresholds for entry field gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapThresholds {
    /// Flag `learned_today` when strictly more than this share of entries lack it.
    pub learned_today_missing_ratio: f64,
    /// Flag `compared_to_past` when strictly more than this share of entries lack it.
    pub compared_to_past_missing_ratio: f64,
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self {
            learned_today_missing_ratio: 0.5,
            compared_to_past_missing_ratio: 0.7,
        }
    }
}

/// Under-populated fields and matching user-facing suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    pub missing_fields: Vec<String>,
    pub suggestions: Vec<String>,
}

impl GapReport {
    pub fn is_empty(&self) -> bool {
        self.missing_fields.is_empty()
    }

    fn flag(&mut self, field: &str, suggestion: String) {
        self.missing_fields.push(field.to_string());
        self.suggestions.push(suggestion);
    }
}

/// Flags sparse optional fields.
#[derive(Debug, Clone, Default)]
pub struct GapDetector {
    thresholds: GapThresholds,
}

impl GapDetector {
    pub fn new(thresholds: GapThresholds) -> Self {
        Self { thresholds }
    }

    pub fn detect_gaps(&self, entries: &[DiaryEntry], completed_tasks: &[Task]) -> GapReport {
        let mut report = GapReport::default();

        if !entries.is_empty() {
            let total = entries.len() as f64;

            let without_learning = count_missing(entries, |e| e.learned_today.as_deref());
            if without_learning as f64 > total * self.thresholds.learned_today_missing_ratio {
                report.flag(
                    "learned_today",
                    format!("{without_learning}件の日記に「学んだこと」が未記入です"),
                );
            }

            let without_comparison = count_missing(entries, |e| e.compared_to_past.as_deref());
            if without_comparison as f64 > total * self.thresholds.compared_to_past_missing_ratio
            {
                report.flag(
                    "compared_to_past",
                    format!("{without_comparison}件の日記に「過去と比べてできたこと」が未記入です"),
                );
            }
        }

        let done = || completed_tasks.iter().filter(|task| task.is_done());

        let without_learnings = done().filter(|task| task.learnings_text().is_none()).count();
        if without_learnings > 0 {
            report.flag(
                "task_learnings",
                format!("{without_learnings}個の完了タスクに「学び」が未記入です"),
            );
        }

        let without_difficulty = done().filter(|task| task.difficulty_pair().is_none()).count();
        if without_difficulty > 0 {
            report.flag(
                "task_difficulty",
                format!("{without_difficulty}個の完了タスクに「難易度」が未記入です"),
            );
        }

        report
    }
}

fn count_missing<F>(entries: &[DiaryEntry], field: F) -> usize
where
    F: Fn(&DiaryEntry) -> Option<&str>,
{
    entries
        .iter()
        .filter(|entry| non_blank(field(entry)).is_none())
        .count()
}
