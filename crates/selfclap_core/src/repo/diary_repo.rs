//! Diary entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide date-keyed CRUD over the `diary_entries` table.
//!
//! # Invariants
//! - One row per date; a second create for the same date is rejected.
//! - Listings are ordered by `date DESC`.

use super::{date_to_db, parse_db_date, parse_small_int, RepoError, RepoResult};
use crate::model::diary::{DiaryEntry, Mood};
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    date,
    content,
    mood,
    learned_today,
    compared_to_past,
    invisible_growth,
    external_feedback,
    self_assessment,
    energy_level,
    challenges_faced,
    how_overcome
FROM diary_entries";

/// Repository interface for diary entries.
pub trait DiaryRepository {
    /// Inserts a new entry; fails with `DuplicateEntryDate` when the date exists.
    fn create_entry(&self, entry: &DiaryEntry) -> RepoResult<NaiveDate>;
    /// Replaces every optional field of the entry stored under `entry.date`.
    fn update_entry(&self, entry: &DiaryEntry) -> RepoResult<()>;
    fn get_entry(&self, date: NaiveDate) -> RepoResult<Option<DiaryEntry>>;
    /// Entries dated on or after `since`, newest first.
    fn list_entries_since(&self, since: NaiveDate) -> RepoResult<Vec<DiaryEntry>>;
    /// All entries, newest first.
    fn list_all_entries(&self) -> RepoResult<Vec<DiaryEntry>>;
    /// Entries with the given mood, newest first.
    fn list_entries_by_mood(&self, mood: Mood) -> RepoResult<Vec<DiaryEntry>>;
}

/// SQLite-backed diary repository.
pub struct SqliteDiaryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDiaryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<DiaryEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

impl DiaryRepository for SqliteDiaryRepository<'_> {
    fn create_entry(&self, entry: &DiaryEntry) -> RepoResult<NaiveDate> {
        entry.validate()?;

        let result = self.conn.execute(
            "INSERT INTO diary_entries (
                date,
                content,
                mood,
                learned_today,
                compared_to_past,
                invisible_growth,
                external_feedback,
                self_assessment,
                energy_level,
                challenges_faced,
                how_overcome
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                date_to_db(entry.date),
                entry.content.as_str(),
                entry.mood.map(Mood::as_str),
                entry.learned_today.as_deref(),
                entry.compared_to_past.as_deref(),
                entry.invisible_growth.as_deref(),
                entry.external_feedback.as_deref(),
                entry.self_assessment.as_deref(),
                entry.energy_level,
                entry.challenges_faced.as_deref(),
                entry.how_overcome.as_deref(),
            ],
        );

        match result {
            Ok(_) => Ok(entry.date),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::DuplicateEntryDate(entry.date))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_entry(&self, entry: &DiaryEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE diary_entries
             SET
                mood = ?2,
                learned_today = ?3,
                compared_to_past = ?4,
                invisible_growth = ?5,
                external_feedback = ?6,
                self_assessment = ?7,
                energy_level = ?8,
                challenges_faced = ?9,
                how_overcome = ?10,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE date = ?1;",
            params![
                date_to_db(entry.date),
                entry.mood.map(Mood::as_str),
                entry.learned_today.as_deref(),
                entry.compared_to_past.as_deref(),
                entry.invisible_growth.as_deref(),
                entry.external_feedback.as_deref(),
                entry.self_assessment.as_deref(),
                entry.energy_level,
                entry.challenges_faced.as_deref(),
                entry.how_overcome.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound(entry.date));
        }
        Ok(())
    }

    fn get_entry(&self, date: NaiveDate) -> RepoResult<Option<DiaryEntry>> {
        let entries = self.query_entries(
            &format!("{ENTRY_SELECT_SQL} WHERE date = ?1;"),
            [date_to_db(date)],
        )?;
        Ok(entries.into_iter().next())
    }

    fn list_entries_since(&self, since: NaiveDate) -> RepoResult<Vec<DiaryEntry>> {
        self.query_entries(
            &format!("{ENTRY_SELECT_SQL} WHERE date >= ?1 ORDER BY date DESC;"),
            [date_to_db(since)],
        )
    }

    fn list_all_entries(&self) -> RepoResult<Vec<DiaryEntry>> {
        self.query_entries(&format!("{ENTRY_SELECT_SQL} ORDER BY date DESC;"), [])
    }

    fn list_entries_by_mood(&self, mood: Mood) -> RepoResult<Vec<DiaryEntry>> {
        self.query_entries(
            &format!("{ENTRY_SELECT_SQL} WHERE mood = ?1 ORDER BY date DESC;"),
            [mood.as_str()],
        )
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<DiaryEntry> {
    let date_text: String = row.get("date")?;
    let date = parse_db_date(&date_text, "diary_entries.date")?;

    let mood = match row.get::<_, Option<String>>("mood")? {
        Some(value) => Some(value.parse::<Mood>().map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid mood `{value}` in diary_entries.mood for {date}"
            ))
        })?),
        None => None,
    };

    let entry = DiaryEntry {
        date,
        content: row.get("content")?,
        mood,
        learned_today: row.get("learned_today")?,
        compared_to_past: row.get("compared_to_past")?,
        invisible_growth: row.get("invisible_growth")?,
        external_feedback: row.get("external_feedback")?,
        self_assessment: row.get("self_assessment")?,
        energy_level: parse_small_int(row.get("energy_level")?, "diary_entries.energy_level")?,
        challenges_faced: row.get("challenges_faced")?,
        how_overcome: row.get("how_overcome")?,
    };
    entry.validate()?;
    Ok(entry)
}
