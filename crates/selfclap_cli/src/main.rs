//! `selfclap` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, open the database under the data directory, and
//!   dispatch to core services and analytics.
//! - Render results as pretty JSON on stdout.
//!
//! # Invariants
//! - Every failure exits non-zero with a one-line diagnostic on stderr.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use selfclap_core::db::Connection;
use selfclap_core::model::diary::merge;
use selfclap_core::{
    build_dashboard, calendar_summary, default_log_level, init_logging, log_dir_for, open_db,
    AnalyticsConfig, DiaryEntry, DiaryPatch, DiaryService, Mood, NewTask, RecommendedMode,
    SqliteDiaryRepository, SqliteRecordStore, SqliteTaskRepository, TaskCompletion, TaskId,
    TaskPriority, TaskService,
};
use serde_json::{json, Value};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "selfclap.db";

#[derive(Parser)]
#[command(name = "selfclap")]
#[command(about = "Growth diary and task journal with reflection analytics")]
#[command(version)]
struct Cli {
    /// Data directory for the database and logs (default: ~/.selfclap)
    #[arg(long, env = "SELFCLAP_HOME", global = true)]
    data_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// JSON file overriding analytics settings
    #[arg(long, env = "SELFCLAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write, enrich and read diary entries
    Diary {
        #[command(subcommand)]
        action: DiaryAction,
    },

    /// Track tasks and what they taught you
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Build the reflection report for a look back at growth
    Reflect,

    /// Build the reflection report for an empathetic listening session
    Listen,

    /// Statistics for a trailing period
    Stats {
        /// Period length in days
        #[arg(long, default_value_t = 30)]
        days: u32,
    },

    /// Streaks and monthly entry coverage
    Calendar {
        /// Year (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (default: current month)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Classify text without storing it
    Classify {
        #[arg(index = 1)]
        text: String,
    },
}

#[derive(Subcommand)]
enum DiaryAction {
    /// Write the entry for a date (default: today)
    Write {
        /// Entry body
        #[arg(index = 1)]
        content: String,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Fill empty fields of an existing entry
    Update {
        #[arg(long)]
        date: Option<NaiveDate>,

        #[command(flatten)]
        fields: EntryFields,
    },

    /// Show one entry (default: today)
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List entries, newest first
    List {
        /// Only the trailing N days
        #[arg(long, conflicts_with = "mood")]
        days: Option<u32>,

        /// Only entries with this mood
        #[arg(long)]
        mood: Option<Mood>,
    },
}

#[derive(Args)]
struct EntryFields {
    /// happy|neutral|tired|stressed|frustrated|anxious
    #[arg(long)]
    mood: Option<Mood>,

    /// What you learned today
    #[arg(long)]
    learned: Option<String>,

    /// What went better than before
    #[arg(long)]
    compared: Option<String>,

    /// Progress nobody else would notice
    #[arg(long)]
    invisible: Option<String>,

    /// What others said
    #[arg(long)]
    feedback: Option<String>,

    /// Your own assessment
    #[arg(long)]
    self_assessment: Option<String>,

    /// Energy 1-5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    energy: Option<u8>,

    #[arg(long)]
    challenges: Option<String>,

    #[arg(long)]
    overcome: Option<String>,
}

impl EntryFields {
    fn into_patch(self) -> DiaryPatch {
        DiaryPatch {
            mood: self.mood,
            learned_today: self.learned,
            compared_to_past: self.compared,
            invisible_growth: self.invisible,
            external_feedback: self.feedback,
            self_assessment: self.self_assessment,
            energy_level: self.energy,
            challenges_faced: self.challenges,
            how_overcome: self.overcome,
        }
    }
}

#[derive(Subcommand)]
enum TaskAction {
    /// Add a task
    Add {
        #[arg(index = 1)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// low|medium|high
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,

        /// Estimated hours
        #[arg(long)]
        estimate: Option<f64>,
    },

    /// List open tasks
    List {
        /// Include done tasks
        #[arg(long)]
        all: bool,
    },

    /// Mark a task done and record what it taught you
    Done {
        #[arg(index = 1)]
        id: TaskId,

        /// Perceived difficulty before starting, 1-5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        before: Option<u8>,

        /// Perceived difficulty after finishing, 1-5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        after: Option<u8>,

        #[arg(long)]
        learnings: Option<String>,

        /// Actual hours
        #[arg(long)]
        actual: Option<f64>,

        #[arg(long)]
        review: Option<String>,
    },

    /// Delete a task
    Delete {
        #[arg(index = 1)]
        id: TaskId,
    },
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let level = cli
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = log_dir_for(&data_dir);
    init_logging(&level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::from_json_file(path)?,
        None => AnalyticsConfig::default(),
    };
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let db_path = data_dir.join(DB_FILE_NAME);
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;

    let output = match cli.command {
        Commands::Diary { action } => {
            let service =
                DiaryService::with_classifier(SqliteDiaryRepository::new(&conn), config.classifier());
            run_diary(&service, action, today)?
        }
        Commands::Task { action } => {
            let service = TaskService::new(SqliteTaskRepository::new(&conn));
            run_task(&service, action, today)?
        }
        Commands::Reflect => reflection_output(&conn, &config, today, RecommendedMode::Reflect)?,
        Commands::Listen => reflection_output(&conn, &config, today, RecommendedMode::Listen)?,
        Commands::Stats { days } => {
            let store = SqliteRecordStore::new(&conn);
            serde_json::to_value(build_dashboard(&store, today, days)?)?
        }
        Commands::Calendar { year, month } => {
            let store = SqliteRecordStore::new(&conn);
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            serde_json::to_value(calendar_summary(&store, today, year, month)?)?
        }
        Commands::Classify { text } => serde_json::to_value(config.classifier().classify(&text))?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_diary(
    service: &DiaryService<SqliteDiaryRepository<'_>>,
    action: DiaryAction,
    today: NaiveDate,
) -> Result<Value> {
    match action {
        DiaryAction::Write {
            content,
            date,
            fields,
        } => {
            let date = date.unwrap_or(today);
            let draft = merge(&DiaryEntry::new(date, content), &fields.into_patch()).entry;
            let outcome = service.write_entry(draft)?;
            let next_command = outcome.signal.recommended_mode.command();
            Ok(json!({
                "entry": outcome.entry,
                "signal": outcome.signal,
                "suggest_enrichment": outcome.suggest_enrichment,
                "next_command": next_command,
            }))
        }
        DiaryAction::Update { date, fields } => {
            let date = date.unwrap_or(today);
            let patch = fields.into_patch();
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field option");
            }
            let outcome = service.enrich_entry(date, &patch)?;
            if outcome.filled.is_empty() {
                warn!("event=diary_enrich module=cli status=noop date={date}");
            }
            Ok(json!({
                "entry": outcome.entry,
                "filled": outcome.filled,
            }))
        }
        DiaryAction::Show { date } => {
            let date = date.unwrap_or(today);
            match service.show_entry(date)? {
                Some(entry) => Ok(serde_json::to_value(entry)?),
                None => bail!("no diary entry for {date}"),
            }
        }
        DiaryAction::List { days, mood } => {
            let entries = match (days, mood) {
                (_, Some(mood)) => service.list_entries_by_mood(mood)?,
                (Some(days), None) => {
                    let since = today
                        .checked_sub_days(chrono::Days::new(u64::from(days)))
                        .with_context(|| format!("cannot go back {days} days from {today}"))?;
                    service.list_entries_since(since)?
                }
                (None, None) => service.list_all_entries()?,
            };
            Ok(serde_json::to_value(entries)?)
        }
    }
}

fn run_task(
    service: &TaskService<SqliteTaskRepository<'_>>,
    action: TaskAction,
    today: NaiveDate,
) -> Result<Value> {
    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            estimate,
        } => {
            let mut task = NewTask::new(title, today);
            task.description = description;
            task.priority = priority;
            task.time_estimated = estimate;
            Ok(serde_json::to_value(service.add_task(&task)?)?)
        }
        TaskAction::List { all } => {
            let tasks = if all {
                service.list_all()?
            } else {
                service.list_active()?
            };
            Ok(serde_json::to_value(tasks)?)
        }
        TaskAction::Done {
            id,
            before,
            after,
            learnings,
            actual,
            review,
        } => {
            let completion = TaskCompletion {
                difficulty_before: before,
                difficulty_after: after,
                learnings,
                time_actual: actual,
                external_review: review,
                ..TaskCompletion::on(today)
            };
            let task = service.complete_task(id, &completion)?;
            let improvement = task
                .difficulty_pair()
                .map(|(before, after)| i32::from(before) - i32::from(after));
            Ok(json!({
                "task": task,
                "improvement": improvement,
            }))
        }
        TaskAction::Delete { id } => {
            service.delete_task(id)?;
            Ok(json!({ "deleted": id }))
        }
    }
}

fn reflection_output(
    conn: &Connection,
    config: &AnalyticsConfig,
    today: NaiveDate,
    mode: RecommendedMode,
) -> Result<Value> {
    let report = config
        .aggregator(SqliteRecordStore::new(conn))
        .build_report(today)?;
    info!(
        "event=reflect_render module=cli status=ok mode={}",
        mode.as_str()
    );
    Ok(json!({
        "mode": mode.as_str(),
        "suggestions": report.data_gaps.suggestions.clone(),
        "report": report,
    }))
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        if !dir.is_absolute() {
            let cwd = std::env::current_dir().context("failed to resolve current directory")?;
            return Ok(cwd.join(dir));
        }
        return Ok(dir);
    }
    match dirs::home_dir() {
        Some(home) => Ok(home.join(".selfclap")),
        None => bail!("cannot locate a home directory; pass --data-dir or set SELFCLAP_HOME"),
    }
}
