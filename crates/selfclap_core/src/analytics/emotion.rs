//! Rule-based emotion classification and follow-up mode recommendation.
//!
//! # Responsibility
//! - Score one diary body against negative/venting/struggling lexicons.
//! - Resolve the flags to at most one follow-up mode.
//!
//! # Invariants
//! - Matching is literal, case-sensitive substring containment on the raw
//!   text; no tokenization or normalization.
//! - Flags are computed independently; only the mode uses priority order.
//! - Same input and lexicons always produce the same signal.

use serde::{Deserialize, Serialize};

/// Capability for finding lexicon hits in a text.
pub trait KeywordMatcher {
    /// Keywords present in `text`, in lexicon order.
    fn matches<'a>(&'a self, text: &str) -> Vec<&'a str>;
}

/// Ordered keyword list matched by substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Lexicon {
    keywords: Vec<String>,
}

impl Lexicon {
    /// Builds a lexicon, dropping blanks and repeated keywords (first wins).
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if !keyword.is_empty() && !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        Self { keywords: unique }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl From<Vec<String>> for Lexicon {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<Lexicon> for Vec<String> {
    fn from(value: Lexicon) -> Self {
        value.keywords
    }
}

impl KeywordMatcher for Lexicon {
    fn matches<'a>(&'a self, text: &str) -> Vec<&'a str> {
        self.keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .map(String::as_str)
            .collect()
    }
}

const NEGATIVE_KEYWORDS: &[&str] = &[
    "むかつく",
    "イライラ",
    "腹立つ",
    "うざい",
    "きつい",
    "つらい",
    "しんどい",
    "疲れた",
    "無理",
    "できない",
    "わからない",
    "ダメ",
    "最悪",
    "嫌",
    "辛い",
];

const VENTING_KEYWORDS: &[&str] = &[
    "先輩",
    "上司",
    "怒られた",
    "注意された",
    "指摘",
    "ばかり",
    "また",
    "いつも",
    "毎回",
    "何度も",
];

const STRUGGLING_KEYWORDS: &[&str] = &[
    "わからない",
    "できない",
    "進まない",
    "詰まった",
    "行き詰まった",
    "どうすれば",
    "もう",
    "限界",
];

/// Lexicons and thresholds used by [`EmotionClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    pub negative: Lexicon,
    pub venting: Lexicon,
    pub struggling: Lexicon,
    /// Distinct venting hits needed before a text counts as venting.
    pub venting_threshold: usize,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            negative: Lexicon::new(NEGATIVE_KEYWORDS.iter().copied()),
            venting: Lexicon::new(VENTING_KEYWORDS.iter().copied()),
            struggling: Lexicon::new(STRUGGLING_KEYWORDS.iter().copied()),
            venting_threshold: 2,
        }
    }
}

/// Follow-up interaction style suggested after a diary write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedMode {
    #[default]
    None,
    /// Empathetic listening.
    Listen,
    /// Analytical, data-backed reflection.
    Reflect,
}

impl RecommendedMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Listen => "listen",
            Self::Reflect => "reflect",
        }
    }

    /// CLI subcommand that runs the recommended mode.
    pub fn command(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Listen => Some("selfclap listen"),
            Self::Reflect => Some("selfclap reflect"),
        }
    }
}

/// Classification result for one diary body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionSignal {
    pub is_negative: bool,
    pub is_venting: bool,
    pub is_frustrated: bool,
    pub is_struggling: bool,
    /// Negative, then venting, then struggling hits; a keyword present in two
    /// lexicons appears twice.
    pub matched_keywords: Vec<String>,
    pub recommended_mode: RecommendedMode,
}

/// Keyword-rule classifier over three lexicons.
#[derive(Debug, Clone)]
pub struct EmotionClassifier<M = Lexicon> {
    negative: M,
    venting: M,
    struggling: M,
    venting_threshold: usize,
}

impl Default for EmotionClassifier<Lexicon> {
    fn default() -> Self {
        Self::with_default_lexicons()
    }
}

impl EmotionClassifier<Lexicon> {
    /// Classifier over the built-in Japanese lexicons.
    pub fn with_default_lexicons() -> Self {
        Self::from_config(EmotionConfig::default())
    }

    pub fn from_config(config: EmotionConfig) -> Self {
        Self::new(
            config.negative,
            config.venting,
            config.struggling,
            config.venting_threshold,
        )
    }
}

impl<M: KeywordMatcher> EmotionClassifier<M> {
    pub fn new(negative: M, venting: M, struggling: M, venting_threshold: usize) -> Self {
        Self {
            negative,
            venting,
            struggling,
            venting_threshold,
        }
    }

    pub fn classify(&self, text: &str) -> EmotionSignal {
        let found_negative = self.negative.matches(text);
        let found_venting = self.venting.matches(text);
        let found_struggling = self.struggling.matches(text);

        let is_negative = !found_negative.is_empty();
        let is_venting = found_venting.len() >= self.venting_threshold;
        let is_struggling = !found_struggling.is_empty();

        let recommended_mode = resolve_mode(is_negative, is_venting, is_struggling);

        let matched_keywords = found_negative
            .into_iter()
            .chain(found_venting)
            .chain(found_struggling)
            .map(str::to_string)
            .collect();

        EmotionSignal {
            is_negative,
            is_venting,
            is_frustrated: is_negative && !is_struggling,
            is_struggling,
            matched_keywords,
            recommended_mode,
        }
    }
}

/// First matching rule wins.
fn resolve_mode(is_negative: bool, is_venting: bool, is_struggling: bool) -> RecommendedMode {
    if is_venting || (is_negative && is_struggling) {
        RecommendedMode::Listen
    } else if is_struggling {
        RecommendedMode::Reflect
    } else if is_negative {
        RecommendedMode::Listen
    } else {
        RecommendedMode::None
    }
}

#[cfg(test)]
mod tests {
    use super::{EmotionClassifier, EmotionConfig, Lexicon, RecommendedMode};

    fn classifier() -> EmotionClassifier {
        EmotionClassifier::with_default_lexicons()
    }

    #[test]
    fn repeated_complaints_route_to_listen() {
        let signal = classifier().classify("むかつく、むかつく、先輩にまた怒られた");
        assert!(signal.is_negative);
        assert!(signal.is_venting);
        assert!(!signal.is_struggling);
        assert!(signal.is_frustrated);
        assert_eq!(signal.recommended_mode, RecommendedMode::Listen);
        assert_eq!(
            signal.matched_keywords,
            vec!["むかつく", "先輩", "怒られた", "また"]
        );
    }

    #[test]
    fn negative_and_struggling_prefers_listen_over_reflect() {
        let signal = classifier().classify("わからない。詰まった。どうすれば");
        assert!(signal.is_negative);
        assert!(signal.is_struggling);
        assert!(!signal.is_venting);
        assert!(!signal.is_frustrated);
        assert_eq!(signal.recommended_mode, RecommendedMode::Listen);
        assert_eq!(
            signal.matched_keywords,
            vec!["わからない", "わからない", "詰まった", "どうすれば"]
        );
    }

    #[test]
    fn neutral_text_has_no_signal() {
        let signal = classifier().classify("今日は特に何もなかった");
        assert!(!signal.is_negative);
        assert!(!signal.is_venting);
        assert!(!signal.is_frustrated);
        assert!(!signal.is_struggling);
        assert!(signal.matched_keywords.is_empty());
        assert_eq!(signal.recommended_mode, RecommendedMode::None);
    }

    #[test]
    fn struggling_without_negativity_routes_to_reflect() {
        let signal = classifier().classify("作業が進まない");
        assert!(signal.is_struggling);
        assert!(!signal.is_negative);
        assert_eq!(signal.recommended_mode, RecommendedMode::Reflect);
    }

    #[test]
    fn single_venting_hit_is_not_venting() {
        let signal = classifier().classify("上司と話した");
        assert!(!signal.is_venting);
        assert_eq!(signal.matched_keywords, vec!["上司"]);
        assert_eq!(signal.recommended_mode, RecommendedMode::None);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let config = EmotionConfig {
            negative: Lexicon::new(["awful"]),
            venting: Lexicon::new(["boss", "again"]),
            struggling: Lexicon::new(["stuck"]),
            venting_threshold: 2,
        };
        let classifier = EmotionClassifier::from_config(config);
        assert_eq!(classifier.classify("AWFUL day").recommended_mode, RecommendedMode::None);

        let signal = classifier.classify("boss yelled again");
        assert!(signal.is_venting);
        assert_eq!(signal.recommended_mode, RecommendedMode::Listen);
    }

    #[test]
    fn lexicon_drops_duplicates_and_blanks() {
        let lexicon = Lexicon::new(["a", "", "b", "a"]);
        assert_eq!(lexicon.keywords(), ["a".to_string(), "b".to_string()]);
    }
}
