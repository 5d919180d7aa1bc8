use chrono::NaiveDate;
use selfclap_core::{AnalyticsConfig, ConfigError, DiaryEntry, RecommendedMode};
use std::io::Write;

#[test]
fn config_file_overrides_markers_and_lexicons() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{
            "emotion": {{ "negative": ["awful"], "struggling": ["stuck"] }},
            "reflection": {{ "affirming_markers": ["nice"] }}
        }}"#
    )
    .unwrap();

    let config = AnalyticsConfig::from_json_file(&path).unwrap();

    let signal = config.classifier().classify("awful day, stuck again");
    assert!(signal.is_negative && signal.is_struggling);
    assert_eq!(signal.recommended_mode, RecommendedMode::Listen);

    let mut entry = DiaryEntry::new(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), "body");
    entry.external_feedback = Some("nice work".to_string());
    entry.learned_today = Some("x".to_string());
    entry.compared_to_past = Some("y".to_string());
    let report = config
        .aggregator(SingleEntry(entry))
        .build_report(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        .unwrap();
    assert_eq!(report.visible_vs_invisible_growth.visible.external_recognition, 1);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AnalyticsConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn zero_venting_threshold_is_rejected() {
    let err = AnalyticsConfig::from_json_str(r#"{ "emotion": { "venting_threshold": 0 } }"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

struct SingleEntry(DiaryEntry);

impl selfclap_core::RecordStore for SingleEntry {
    fn entries_since(&self, since: NaiveDate) -> selfclap_core::RepoResult<Vec<DiaryEntry>> {
        Ok([self.0.clone()]
            .into_iter()
            .filter(|e| e.date >= since)
            .collect())
    }

    fn entry_by_date(&self, date: NaiveDate) -> selfclap_core::RepoResult<Option<DiaryEntry>> {
        Ok((self.0.date == date).then(|| self.0.clone()))
    }

    fn all_entries(&self) -> selfclap_core::RepoResult<Vec<DiaryEntry>> {
        Ok(vec![self.0.clone()])
    }

    fn tasks_completed_since(
        &self,
        _since: NaiveDate,
    ) -> selfclap_core::RepoResult<Vec<selfclap_core::Task>> {
        Ok(Vec::new())
    }

    fn all_tasks(&self) -> selfclap_core::RepoResult<Vec<selfclap_core::Task>> {
        Ok(Vec::new())
    }
}
