//! Diary use-case service.
//!
//! # Responsibility
//! - Write new entries and classify their body for a follow-up mode.
//! - Enrich existing entries under the append-only merge rule.
//!
//! # Invariants
//! - A date is written once; later writes go through [`DiaryService::enrich_entry`].
//! - Entry text never reaches the log; only metadata does.

use crate::analytics::emotion::{EmotionClassifier, EmotionSignal, KeywordMatcher, Lexicon};
use crate::model::diary::{merge, DiaryEntry, DiaryPatch, Mood};
use crate::repo::diary_repo::DiaryRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for diary use-cases.
#[derive(Debug)]
pub enum DiaryServiceError {
    /// An entry for this date already exists.
    DuplicateDate(NaiveDate),
    EntryNotFound(NaiveDate),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for DiaryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateDate(date) => write!(
                f,
                "diary entry for {date} already exists; use update to add details"
            ),
            Self::EntryNotFound(date) => write!(f, "no diary entry for {date}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent diary state: {details}"),
        }
    }
}

impl Error for DiaryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DiaryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEntryDate(date) => Self::DuplicateDate(date),
            RepoError::EntryNotFound(date) => Self::EntryNotFound(date),
            other => Self::Repo(other),
        }
    }
}

/// Result of writing a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryWriteOutcome {
    pub entry: DiaryEntry,
    pub signal: EmotionSignal,
    /// No growth/evaluation fields were given and the body is not venting,
    /// so asking for those details is worthwhile.
    pub suggest_enrichment: bool,
}

/// Result of enriching an existing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryEnrichOutcome {
    pub entry: DiaryEntry,
    /// Fields the patch filled; empty when nothing changed.
    pub filled: Vec<&'static str>,
}

/// Diary service facade over a repository and a classifier.
pub struct DiaryService<R: DiaryRepository, M: KeywordMatcher = Lexicon> {
    repo: R,
    classifier: EmotionClassifier<M>,
}

impl<R: DiaryRepository> DiaryService<R> {
    /// Service using the built-in lexicons.
    pub fn new(repo: R) -> Self {
        Self::with_classifier(repo, EmotionClassifier::with_default_lexicons())
    }
}

impl<R: DiaryRepository, M: KeywordMatcher> DiaryService<R, M> {
    pub fn with_classifier(repo: R, classifier: EmotionClassifier<M>) -> Self {
        Self { repo, classifier }
    }

    /// Stores a new entry and classifies its body.
    pub fn write_entry(&self, entry: DiaryEntry) -> Result<DiaryWriteOutcome, DiaryServiceError> {
        let date = self.repo.create_entry(&entry)?;
        let stored = self
            .repo
            .get_entry(date)?
            .ok_or(DiaryServiceError::InconsistentState(
                "created entry not found in read-back",
            ))?;

        let signal = self.classifier.classify(&stored.content);
        let suggest_enrichment = !stored.has_reflection_fields() && !signal.is_venting;

        info!(
            "event=diary_write module=service status=ok date={} recommended_mode={} keyword_hits={}",
            date,
            signal.recommended_mode.as_str(),
            signal.matched_keywords.len()
        );

        Ok(DiaryWriteOutcome {
            entry: stored,
            signal,
            suggest_enrichment,
        })
    }

    /// Fills empty optional fields of the entry for `date`.
    pub fn enrich_entry(
        &self,
        date: NaiveDate,
        patch: &DiaryPatch,
    ) -> Result<DiaryEnrichOutcome, DiaryServiceError> {
        let existing = self
            .repo
            .get_entry(date)?
            .ok_or(DiaryServiceError::EntryNotFound(date))?;

        let outcome = merge(&existing, patch);
        if outcome.filled.is_empty() {
            return Ok(DiaryEnrichOutcome {
                entry: existing,
                filled: Vec::new(),
            });
        }

        self.repo.update_entry(&outcome.entry)?;
        info!(
            "event=diary_enrich module=service status=ok date={} filled={}",
            date,
            outcome.filled.join(",")
        );

        let stored = self
            .repo
            .get_entry(date)?
            .ok_or(DiaryServiceError::InconsistentState(
                "enriched entry not found in read-back",
            ))?;
        Ok(DiaryEnrichOutcome {
            entry: stored,
            filled: outcome.filled,
        })
    }

    /// Classifies arbitrary text without storing anything.
    pub fn classify(&self, text: &str) -> EmotionSignal {
        self.classifier.classify(text)
    }

    pub fn show_entry(&self, date: NaiveDate) -> RepoResult<Option<DiaryEntry>> {
        self.repo.get_entry(date)
    }

    pub fn list_entries_since(&self, since: NaiveDate) -> RepoResult<Vec<DiaryEntry>> {
        self.repo.list_entries_since(since)
    }

    pub fn list_all_entries(&self) -> RepoResult<Vec<DiaryEntry>> {
        self.repo.list_all_entries()
    }

    pub fn list_entries_by_mood(&self, mood: Mood) -> RepoResult<Vec<DiaryEntry>> {
        self.repo.list_entries_by_mood(mood)
    }
}
