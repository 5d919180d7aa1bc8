//! Period statistics dashboard.
//!
//! Unlike the reflection report, difficulty changes here keep their sign:
//! zero and negative improvements count toward the average.

use super::reflection::DifficultyImprovement;
use super::{AnalyticsResult, DateWindow};
use crate::model::diary::{DiaryEntry, Mood};
use crate::model::non_blank;
use crate::repo::record_store::RecordStore;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

const DIFFICULTY_CHANGES_LIMIT: usize = 10;
const LOW_GROWTH_FILL_PERCENT: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodShare {
    pub mood: Mood,
    pub count: usize,
    pub percent: f64,
}

/// How often each reflection field is filled in the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFill {
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthFillRates {
    pub learned_today: FieldFill,
    pub compared_to_past: FieldFill,
    pub invisible_growth: FieldFill,
    pub external_feedback: FieldFill,
    pub self_assessment: FieldFill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub period: DateWindow,
    pub period_days: u32,
    pub entry_count: usize,
    pub tasks_completed: usize,
    pub days_with_entries: usize,
    /// `days_with_entries / period_days * 100`; `None` for an empty period.
    pub continuation_rate: Option<f64>,
    /// Sorted by count, most frequent first.
    pub mood_distribution: Vec<MoodShare>,
    pub growth_fill: GrowthFillRates,
    /// Largest improvement first.
    pub difficulty_changes: Vec<DifficultyImprovement>,
    /// Mean signed improvement over every rated task in the period.
    pub average_improvement: Option<f64>,
    /// Set when learned/compared/invisible fields are filled on under 30% of
    /// the possible slots.
    pub low_growth_advice: bool,
}

/// Builds dashboard statistics for `today - days ..= today`.
pub fn build_dashboard<S: RecordStore>(
    store: &S,
    today: NaiveDate,
    days: u32,
) -> AnalyticsResult<DashboardStats> {
    let started_at = Instant::now();
    let period = DateWindow::trailing(today, days)?;

    let entries: Vec<DiaryEntry> = store
        .entries_since(period.start)?
        .into_iter()
        .filter(|entry| period.contains(entry.date))
        .collect();
    let completed: Vec<_> = store
        .tasks_completed_since(period.start)?
        .into_iter()
        .filter(|task| task.completed_date.is_some_and(|date| period.contains(date)))
        .collect();

    let days_with_entries = entries
        .iter()
        .map(|entry| entry.date)
        .collect::<BTreeSet<_>>()
        .len();
    let continuation_rate = (days > 0 && !entries.is_empty())
        .then(|| days_with_entries as f64 / f64::from(days) * 100.0);

    let growth_fill = GrowthFillRates {
        learned_today: fill(&entries, |e| e.learned_today.as_deref()),
        compared_to_past: fill(&entries, |e| e.compared_to_past.as_deref()),
        invisible_growth: fill(&entries, |e| e.invisible_growth.as_deref()),
        external_feedback: fill(&entries, |e| e.external_feedback.as_deref()),
        self_assessment: fill(&entries, |e| e.self_assessment.as_deref()),
    };

    let mut changes: Vec<DifficultyImprovement> = completed
        .iter()
        .filter_map(DifficultyImprovement::from_task)
        .collect();
    let average_improvement = average_improvement(&changes);
    changes.sort_by(|a, b| b.improvement.cmp(&a.improvement));
    changes.truncate(DIFFICULTY_CHANGES_LIMIT);

    let growth_slots = entries.len() * 3;
    let growth_filled = growth_fill.learned_today.count
        + growth_fill.compared_to_past.count
        + growth_fill.invisible_growth.count;
    let low_growth_advice = growth_slots > 0
        && (growth_filled as f64 / growth_slots as f64 * 100.0) < LOW_GROWTH_FILL_PERCENT;

    let stats = DashboardStats {
        period,
        period_days: days,
        entry_count: entries.len(),
        tasks_completed: completed.len(),
        days_with_entries,
        continuation_rate,
        mood_distribution: mood_distribution(&entries),
        growth_fill,
        difficulty_changes: changes,
        average_improvement,
        low_growth_advice,
    };

    info!(
        "event=dashboard_build module=analytics status=ok duration_ms={} period_days={} entries={} tasks_completed={}",
        started_at.elapsed().as_millis(),
        days,
        stats.entry_count,
        stats.tasks_completed
    );
    Ok(stats)
}

/// Mean signed improvement, `None` when nothing was rated.
pub fn average_improvement(changes: &[DifficultyImprovement]) -> Option<f64> {
    if changes.is_empty() {
        return None;
    }
    let total: i64 = changes.iter().map(|item| i64::from(item.improvement)).sum();
    Some(total as f64 / changes.len() as f64)
}

fn mood_distribution(entries: &[DiaryEntry]) -> Vec<MoodShare> {
    let mut counts: BTreeMap<Mood, usize> = BTreeMap::new();
    for mood in entries.iter().filter_map(|entry| entry.mood) {
        *counts.entry(mood).or_default() += 1;
    }
    let total: usize = counts.values().sum();

    let mut shares: Vec<MoodShare> = counts
        .into_iter()
        .map(|(mood, count)| MoodShare {
            mood,
            count,
            percent: count as f64 / total as f64 * 100.0,
        })
        .collect();
    // Ties fall back to enum order from the BTreeMap.
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

fn fill<F>(entries: &[DiaryEntry], field: F) -> FieldFill
where
    F: Fn(&DiaryEntry) -> Option<&str>,
{
    let count = entries
        .iter()
        .filter(|entry| non_blank(field(entry)).is_some())
        .count();
    let percent = if entries.is_empty() {
        0.0
    } else {
        count as f64 / entries.len() as f64 * 100.0
    };
    FieldFill { count, percent }
}
