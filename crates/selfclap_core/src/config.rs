//! Analytics configuration.
//!
//! # Responsibility
//! - Bundle lexicons, gap thresholds and report settings into one value that
//!   is injected into the analytics components.
//! - Load optional JSON overrides; omitted keys keep their defaults.
//!
//! # Invariants
//! - Configuration is immutable once loaded.

use crate::analytics::emotion::{EmotionClassifier, EmotionConfig};
use crate::analytics::gaps::{GapDetector, GapThresholds};
use crate::analytics::reflection::{ReflectionAggregator, ReflectionSettings};
use crate::repo::record_store::RecordStore;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub emotion: EmotionConfig,
    pub gaps: GapThresholds,
    pub reflection: ReflectionSettings,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl AnalyticsConfig {
    /// Parses JSON overrides on top of the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, ratio) in [
            (
                "gaps.learned_today_missing_ratio",
                self.gaps.learned_today_missing_ratio,
            ),
            (
                "gaps.compared_to_past_missing_ratio",
                self.gaps.compared_to_past_missing_ratio,
            ),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0.0..=1.0, got {ratio}"
                )));
            }
        }
        if self.emotion.venting_threshold == 0 {
            return Err(ConfigError::Invalid(
                "emotion.venting_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classifier(&self) -> EmotionClassifier {
        EmotionClassifier::from_config(self.emotion.clone())
    }

    pub fn gap_detector(&self) -> GapDetector {
        GapDetector::new(self.gaps.clone())
    }

    pub fn aggregator<S: RecordStore>(&self, store: S) -> ReflectionAggregator<S> {
        ReflectionAggregator::with_config(store, self.reflection.clone(), self.gaps.clone())
    }
}
