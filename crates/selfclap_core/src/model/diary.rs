//! Diary entry model and the append-only enrichment rule.
//!
//! # Invariants
//! - `date` is the identity; the store holds at most one entry per date.
//! - Enrichment never overwrites a populated optional field (see [`merge`]).

use super::{non_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Mood tag attached to a diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Neutral,
    Tired,
    Stressed,
    Frustrated,
    Anxious,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Neutral,
        Mood::Tired,
        Mood::Stressed,
        Mood::Frustrated,
        Mood::Anxious,
    ];

    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Stressed => "stressed",
            Self::Frustrated => "frustrated",
            Self::Anxious => "anxious",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == value.trim())
            .ok_or_else(|| {
                format!(
                    "unknown mood `{value}`; expected happy|neutral|tired|stressed|frustrated|anxious"
                )
            })
    }
}

/// One day's diary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub date: NaiveDate,
    /// Free-text body.
    pub content: String,
    pub mood: Option<Mood>,
    /// Growth signal: what was learned today.
    pub learned_today: Option<String>,
    /// Growth signal: what went better than in the past.
    pub compared_to_past: Option<String>,
    /// Growth signal: progress nobody else would notice.
    pub invisible_growth: Option<String>,
    /// Evaluation axis: what others said.
    pub external_feedback: Option<String>,
    /// Evaluation axis: the writer's own assessment.
    pub self_assessment: Option<String>,
    pub energy_level: Option<u8>,
    pub challenges_faced: Option<String>,
    pub how_overcome: Option<String>,
}

impl DiaryEntry {
    /// Creates an entry with only the body set.
    pub fn new(date: NaiveDate, content: impl Into<String>) -> Self {
        Self {
            date,
            content: content.into(),
            mood: None,
            learned_today: None,
            compared_to_past: None,
            invisible_growth: None,
            external_feedback: None,
            self_assessment: None,
            energy_level: None,
            challenges_faced: None,
            how_overcome: None,
        }
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyEntryContent { date: self.date });
        }
        Ok(())
    }

    /// Whether any growth-signal or evaluation-axis field carries text.
    pub fn has_reflection_fields(&self) -> bool {
        [
            &self.learned_today,
            &self.compared_to_past,
            &self.invisible_growth,
            &self.external_feedback,
            &self.self_assessment,
        ]
        .into_iter()
        .any(|field| non_blank(field.as_deref()).is_some())
    }
}

/// Partial update for the enrichment path. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiaryPatch {
    pub mood: Option<Mood>,
    pub learned_today: Option<String>,
    pub compared_to_past: Option<String>,
    pub invisible_growth: Option<String>,
    pub external_feedback: Option<String>,
    pub self_assessment: Option<String>,
    pub energy_level: Option<u8>,
    pub challenges_faced: Option<String>,
    pub how_overcome: Option<String>,
}

impl DiaryPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of applying a patch: the updated entry plus the fields it filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub entry: DiaryEntry,
    /// Column names filled by the patch, in declaration order.
    pub filled: Vec<&'static str>,
}

/// Applies `patch` to `existing` under append-only enrichment.
///
/// Per field: a non-blank existing value wins; otherwise a non-blank patch
/// value is taken. Blank patch values never clear anything. `date` and
/// `content` are not patchable.
pub fn merge(existing: &DiaryEntry, patch: &DiaryPatch) -> MergeOutcome {
    let mut entry = existing.clone();
    let mut filled = Vec::new();

    if entry.mood.is_none() && patch.mood.is_some() {
        entry.mood = patch.mood;
        filled.push("mood");
    }
    fill_text(&mut entry.learned_today, &patch.learned_today, "learned_today", &mut filled);
    fill_text(
        &mut entry.compared_to_past,
        &patch.compared_to_past,
        "compared_to_past",
        &mut filled,
    );
    fill_text(
        &mut entry.invisible_growth,
        &patch.invisible_growth,
        "invisible_growth",
        &mut filled,
    );
    fill_text(
        &mut entry.external_feedback,
        &patch.external_feedback,
        "external_feedback",
        &mut filled,
    );
    fill_text(
        &mut entry.self_assessment,
        &patch.self_assessment,
        "self_assessment",
        &mut filled,
    );
    if entry.energy_level.is_none() && patch.energy_level.is_some() {
        entry.energy_level = patch.energy_level;
        filled.push("energy_level");
    }
    fill_text(
        &mut entry.challenges_faced,
        &patch.challenges_faced,
        "challenges_faced",
        &mut filled,
    );
    fill_text(&mut entry.how_overcome, &patch.how_overcome, "how_overcome", &mut filled);

    MergeOutcome { entry, filled }
}

fn fill_text(
    slot: &mut Option<String>,
    incoming: &Option<String>,
    name: &'static str,
    filled: &mut Vec<&'static str>,
) {
    if non_blank(slot.as_deref()).is_some() {
        return;
    }
    if let Some(value) = non_blank(incoming.as_deref()) {
        *slot = Some(value.to_string());
        filled.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::{merge, DiaryEntry, DiaryPatch, Mood};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn merge_fills_only_empty_fields() {
        let mut existing = DiaryEntry::new(day(), "body");
        existing.learned_today = Some("borrow checker".to_string());
        existing.compared_to_past = Some("   ".to_string());

        let patch = DiaryPatch {
            learned_today: Some("overwrite attempt".to_string()),
            compared_to_past: Some("faster review".to_string()),
            mood: Some(Mood::Happy),
            ..DiaryPatch::default()
        };

        let outcome = merge(&existing, &patch);
        assert_eq!(outcome.entry.learned_today.as_deref(), Some("borrow checker"));
        assert_eq!(outcome.entry.compared_to_past.as_deref(), Some("faster review"));
        assert_eq!(outcome.entry.mood, Some(Mood::Happy));
        assert_eq!(outcome.filled, vec!["mood", "compared_to_past"]);
    }

    #[test]
    fn merge_ignores_blank_patch_values() {
        let existing = DiaryEntry::new(day(), "body");
        let patch = DiaryPatch {
            invisible_growth: Some(" ".to_string()),
            ..DiaryPatch::default()
        };

        let outcome = merge(&existing, &patch);
        assert_eq!(outcome.entry, existing);
        assert!(outcome.filled.is_empty());
    }

    #[test]
    fn mood_parses_known_names_only() {
        assert_eq!("tired".parse::<Mood>().unwrap(), Mood::Tired);
        assert!("sleepy".parse::<Mood>().is_err());
    }
}
