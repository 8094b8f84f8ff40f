//! Story classification
//!
//! Detects whether content is narrative, story-based material from its text
//! metadata. Four channels are scanned in order (title, description, tags,
//! subtitle); every keyword hit adds its weight to a raw score which is
//! normalized against `MAX_RAW_SCORE`. Any anti-pattern hit (tutorials,
//! reviews, news, ...) vetoes the positive classification but leaves the
//! confidence untouched, so callers can tell "vetoed" from "never story-like".

use crate::types::{ClassificationResult, UniversalMetrics};
use serde::{Deserialize, Serialize};

/// Raw score treated as maximal story signal (confidence 1.0)
pub const MAX_RAW_SCORE: f64 = 10.0;

/// Default minimum confidence for a positive classification
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Default number of subtitle characters examined
pub const DEFAULT_SUBTITLE_SCAN_CHARS: usize = 500;

/// Prefix of indicators produced by the anti-pattern veto
pub const ANTI_PATTERN_PREFIX: &str = "anti-pattern";

/// Title keywords, weighted by how strongly they signal a story
const TITLE_KEYWORDS: &[(&str, f64)] = &[
    // High confidence
    ("story", 3.0),
    ("storytime", 3.0),
    ("story time", 3.0),
    ("true story", 3.0),
    ("aita", 3.0),
    ("am i the", 3.0),
    ("tifu", 3.0),
    ("confession", 3.0),
    ("revenge", 3.0),
    // Medium confidence
    ("relationship", 2.0),
    ("breakup", 2.0),
    ("cheating", 2.0),
    ("caught", 2.0),
    ("ex boyfriend", 2.0),
    ("ex girlfriend", 2.0),
    ("my wife", 2.0),
    ("my husband", 2.0),
    ("drama", 2.0),
    ("toxic", 2.0),
    ("entitled", 2.0),
    ("karen", 2.0),
    // Low confidence
    ("experience", 1.0),
    ("happened", 1.0),
    ("crazy", 1.0),
    ("insane", 1.0),
    ("unbelievable", 1.0),
    ("shocking", 1.0),
    ("betrayed", 1.0),
];

const DESCRIPTION_KEYWORDS: &[(&str, f64)] = &[
    ("story", 1.0),
    ("storytime", 1.0),
    ("experience", 1.0),
    ("happened to me", 1.0),
    ("true story", 1.0),
    ("real story", 1.0),
    ("my story", 1.0),
    ("i want to share", 1.0),
    ("let me tell you", 1.0),
    ("this is about", 1.0),
    ("backstory", 1.0),
    ("narrative", 1.0),
    ("tale", 1.0),
];

/// Matched against whole tags
const TAG_KEYWORDS: &[(&str, f64)] = &[
    ("story", 1.0),
    ("storytime", 1.0),
    ("story time", 1.0),
    ("storytelling", 1.0),
    ("true story", 1.0),
    ("real story", 1.0),
    ("personal story", 1.0),
    ("life story", 1.0),
    ("reddit story", 1.0),
    ("relationship story", 1.0),
    ("revenge story", 1.0),
    ("aita", 1.0),
    ("tifu", 1.0),
    ("confession", 1.0),
];

/// First-person narrative markers
const SUBTITLE_MARKERS: &[(&str, f64)] = &[
    ("i was", 1.0),
    ("i had", 1.0),
    ("i went", 1.0),
    ("i got", 1.0),
    ("i decided", 1.0),
    ("i thought", 1.0),
    ("my story", 1.0),
    ("this happened", 1.0),
    ("so this happened", 1.0),
];

/// Non-story keywords; any hit vetoes the classification
const ANTI_PATTERNS: &[&str] = &[
    "tutorial",
    "how to",
    "review",
    "unboxing",
    "haul",
    "vlog",
    "gameplay",
    "walkthrough",
    "guide",
    "tips",
    "tricks",
    "react",
    "reaction",
    "news",
    "update",
    "announcement",
    "trailer",
    "teaser",
    "music video",
    "podcast",
    "interview",
    "q&a",
    "q and a",
    "challenge",
    "prank",
];

/// Word endings an anti-pattern may carry and still match
const ANTI_PATTERN_INFLECTIONS: &[&str] = &["s", "es", "ing", "ed"];

/// Immutable keyword tables shared by every `detect` call
#[derive(Debug, Clone, Copy)]
pub struct KeywordTables {
    pub title: &'static [(&'static str, f64)],
    pub description: &'static [(&'static str, f64)],
    pub tags: &'static [(&'static str, f64)],
    pub subtitle: &'static [(&'static str, f64)],
    pub anti_patterns: &'static [&'static str],
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            title: TITLE_KEYWORDS,
            description: DESCRIPTION_KEYWORDS,
            tags: TAG_KEYWORDS,
            subtitle: SUBTITLE_MARKERS,
            anti_patterns: ANTI_PATTERNS,
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum confidence to classify as story (0-1)
    pub confidence_threshold: f64,
    /// Leading subtitle characters scanned for narrative markers
    pub subtitle_scan_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            subtitle_scan_chars: DEFAULT_SUBTITLE_SCAN_CHARS,
        }
    }
}

/// Text channel being scanned, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Title,
    Description,
    Tag,
    Subtitle,
}

impl Channel {
    fn label(self) -> &'static str {
        match self {
            Channel::Title => "title",
            Channel::Description => "description",
            Channel::Tag => "tag",
            Channel::Subtitle => "subtitle",
        }
    }
}

/// Weighted-keyword story detector
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    config: ClassifierConfig,
    tables: KeywordTables,
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl ContentClassifier {
    /// Create a classifier; the threshold is clamped to 0-1
    pub fn new(mut config: ClassifierConfig) -> Self {
        config.confidence_threshold = if config.confidence_threshold.is_nan() {
            DEFAULT_CONFIDENCE_THRESHOLD
        } else {
            config.confidence_threshold.clamp(0.0, 1.0)
        };
        Self {
            config,
            tables: KeywordTables::default(),
        }
    }

    /// Create a classifier with a specific confidence threshold
    pub fn with_threshold(confidence_threshold: f64) -> Self {
        Self::new(ClassifierConfig {
            confidence_threshold,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a text bundle
    pub fn detect<S: AsRef<str>>(
        &self,
        title: &str,
        description: &str,
        tags: &[S],
        subtitle_text: Option<&str>,
    ) -> ClassificationResult {
        let title = title.to_lowercase();
        let description = description.to_lowercase();
        let tags: Vec<String> = tags.iter().map(|tag| normalize_tag(tag.as_ref())).collect();
        let subtitle = subtitle_text
            .map(|text| {
                text.chars()
                    .take(self.config.subtitle_scan_chars)
                    .collect::<String>()
                    .to_lowercase()
            })
            .unwrap_or_default();

        let mut raw_score: f64 = 0.0;
        let mut indicators = Vec::new();

        raw_score += scan_text(Channel::Title, &title, self.tables.title, &mut indicators);
        raw_score += scan_text(
            Channel::Description,
            &description,
            self.tables.description,
            &mut indicators,
        );
        raw_score += scan_tags(&tags, self.tables.tags, &mut indicators);
        raw_score += scan_text(
            Channel::Subtitle,
            &subtitle,
            self.tables.subtitle,
            &mut indicators,
        );

        let confidence = (raw_score / MAX_RAW_SCORE).min(1.0);

        let channels = [
            (Channel::Title, std::slice::from_ref(&title)),
            (Channel::Description, std::slice::from_ref(&description)),
            (Channel::Tag, tags.as_slice()),
            (Channel::Subtitle, std::slice::from_ref(&subtitle)),
        ];
        let mut vetoed = false;
        for (channel, texts) in channels {
            for pattern in self.tables.anti_patterns {
                if texts.iter().any(|text| contains_inflected(text, pattern)) {
                    vetoed = true;
                    indicators.push(format!(
                        "{ANTI_PATTERN_PREFIX} {}: {pattern}",
                        channel.label()
                    ));
                }
            }
        }

        let is_story =
            !vetoed && raw_score > 0.0 && confidence >= self.config.confidence_threshold;

        ClassificationResult {
            is_story,
            confidence,
            indicators,
        }
    }

    /// Classify the text fields already present on a normalized record
    pub fn detect_metrics(&self, metrics: &UniversalMetrics) -> ClassificationResult {
        self.detect(
            &metrics.title,
            &metrics.description,
            metrics.tags.as_slice(),
            metrics.subtitle_text.as_deref(),
        )
    }
}

/// Score free text against a keyword table
fn scan_text(
    channel: Channel,
    text: &str,
    keywords: &[(&str, f64)],
    indicators: &mut Vec<String>,
) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let mut score: f64 = 0.0;
    for (keyword, weight) in keywords {
        if contains_phrase(text, keyword) {
            score += weight;
            indicators.push(format!("{}: {keyword}", channel.label()));
        }
    }
    score
}

/// Score tags element-wise; each keyword fires at most once
fn scan_tags(tags: &[String], keywords: &[(&str, f64)], indicators: &mut Vec<String>) -> f64 {
    let mut score: f64 = 0.0;
    let mut fired: Vec<&str> = Vec::new();
    for tag in tags {
        for (keyword, weight) in keywords {
            if tag == *keyword && !fired.contains(keyword) {
                fired.push(*keyword);
                score += weight;
                indicators.push(format!("{}: {keyword}", Channel::Tag.label()));
            }
        }
    }
    score
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').trim().to_lowercase()
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric characters
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Like `contains_phrase`, but the phrase may end in a plural or verb
/// inflection ("reviews", "reacting")
fn contains_inflected(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        if before.is_some_and(char::is_alphanumeric) {
            return false;
        }
        let rest = &haystack[start + matched.len()..];
        let suffix_len = rest
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(rest.len());
        suffix_len == 0 || ANTI_PATTERN_INFLECTIONS.contains(&&rest[..suffix_len])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NO_TAGS: [&str; 0] = [];

    #[test]
    fn test_story_signals_across_channels() {
        let classifier = ContentClassifier::default();
        let result = classifier.detect(
            "My AITA Story",
            "This happened to me",
            &["storytime", "aita"],
            Some("I was at the store when..."),
        );

        assert!(result.is_story);
        assert!(result.confidence >= 0.3);
        assert_eq!(
            result.indicators,
            vec![
                "title: story",
                "title: aita",
                "description: happened to me",
                "tag: storytime",
                "tag: aita",
                "subtitle: i was",
            ]
        );
        assert!(!result.was_vetoed());
    }

    #[test]
    fn test_anti_pattern_vetoes_story() {
        let classifier = ContentClassifier::default();
        let result = classifier.detect(
            "How to Tutorial: Make Videos",
            "step by step guide",
            &["tutorial"],
            Some(""),
        );

        assert!(!result.is_story);
        assert!(result.was_vetoed());
        assert!(result
            .indicators
            .contains(&"anti-pattern title: tutorial".to_string()));
        assert!(result
            .indicators
            .contains(&"anti-pattern title: how to".to_string()));
        assert!(result
            .indicators
            .contains(&"anti-pattern description: guide".to_string()));
        assert!(result
            .indicators
            .contains(&"anti-pattern tag: tutorial".to_string()));
    }

    #[test]
    fn test_veto_keeps_confidence() {
        let classifier = ContentClassifier::default();
        let result = classifier.detect(
            "Storytime reaction: my crazy revenge",
            "",
            &NO_TAGS,
            None,
        );

        // storytime 3 + revenge 3 + crazy 1
        assert_eq!(result.confidence, 0.7);
        assert!(!result.is_story);
        assert_eq!(
            result.indicators.last().map(String::as_str),
            Some("anti-pattern title: reaction")
        );
    }

    #[test]
    fn test_empty_inputs() {
        let classifier = ContentClassifier::default();
        let result = classifier.detect("", "", &NO_TAGS, None);

        assert_eq!(result, ClassificationResult::default());
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_story);
        assert!(result.indicators.is_empty());
    }

    #[test]
    fn test_empty_inputs_never_story_even_at_zero_threshold() {
        let classifier = ContentClassifier::with_threshold(0.0);
        let result = classifier.detect("", "", &NO_TAGS, None);
        assert!(!result.is_story);
    }

    #[test]
    fn test_threshold_boundary() {
        let classifier = ContentClassifier::default();

        // Single high-confidence keyword reaches exactly the default threshold
        let result = classifier.detect("Storytime", "", &NO_TAGS, None);
        assert_eq!(result.confidence, 0.3);
        assert!(result.is_story);

        let result = classifier.detect("That was crazy", "", &NO_TAGS, None);
        assert_eq!(result.confidence, 0.1);
        assert!(!result.is_story);

        let strict = ContentClassifier::with_threshold(0.8);
        let result = strict.detect("Storytime", "", &NO_TAGS, None);
        assert!(!result.is_story);
    }

    #[test]
    fn test_confidence_capped_at_one() {
        let classifier = ContentClassifier::default();
        let result = classifier.detect(
            "TIFU confession: true story of revenge on my toxic ex boyfriend",
            "my story, a true story",
            &["storytime", "aita", "tifu"],
            Some("So this happened. I was home, I had a plan, I decided to act"),
        );
        assert_eq!(result.confidence, 1.0);
        assert!(result.is_story);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_word_bounded() {
        let classifier = ContentClassifier::default();

        let result = classifier.detect("STORYTIME", "", &NO_TAGS, None);
        assert_eq!(result.indicators, vec!["title: storytime"]);

        // "news" inside "newsletter" is not an anti-pattern
        let result = classifier.detect("AITA", "subscribe to my newsletter", &NO_TAGS, None);
        assert!(result.is_story);
        assert!(!result.was_vetoed());
    }

    #[test]
    fn test_tags_are_normalized() {
        let classifier = ContentClassifier::default();
        let result = classifier.detect("", "", &["#StoryTime", " AITA ", "aita"], None);

        assert_eq!(result.indicators, vec!["tag: storytime", "tag: aita"]);
        assert_eq!(result.confidence, 0.2);
    }

    #[test]
    fn test_subtitle_scan_window() {
        let classifier = ContentClassifier::new(ClassifierConfig {
            subtitle_scan_chars: 20,
            ..Default::default()
        });
        let subtitle = format!("{} i was there", "x".repeat(30));
        let result = classifier.detect("", "", &NO_TAGS, Some(&subtitle));
        assert!(result.indicators.is_empty());

        let result = ContentClassifier::default().detect("", "", &NO_TAGS, Some(&subtitle));
        assert_eq!(result.indicators, vec!["subtitle: i was"]);
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(
            ContentClassifier::with_threshold(4.0).config().confidence_threshold,
            1.0
        );
        assert_eq!(
            ContentClassifier::with_threshold(-1.0).config().confidence_threshold,
            0.0
        );
        assert_eq!(
            ContentClassifier::with_threshold(f64::NAN)
                .config()
                .confidence_threshold,
            DEFAULT_CONFIDENCE_THRESHOLD
        );
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"confidence_threshold": 0.5}"#).unwrap();
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.subtitle_scan_chars, DEFAULT_SUBTITLE_SCAN_CHARS);
    }

    #[test]
    fn test_contains_phrase() {
        assert!(contains_phrase("how to cook", "how to"));
        assert!(contains_phrase("live q&a!", "q&a"));
        assert!(!contains_phrase("reviewer", "review"));
        assert!(!contains_phrase("showtown", "how to"));
        assert!(contains_phrase("storytime!", "storytime"));
    }

    #[test]
    fn test_inflected_anti_patterns_veto() {
        let classifier = ContentClassifier::default();

        let result = classifier.detect(
            "AITA? Storytime reacting to reviews of my restaurant",
            "",
            &NO_TAGS,
            None,
        );
        assert!(!result.is_story);
        assert_eq!(result.confidence, 0.6);
        assert!(result
            .indicators
            .contains(&"anti-pattern title: react".to_string()));
        assert!(result
            .indicators
            .contains(&"anti-pattern title: review".to_string()));

        let result = classifier.detect(
            "My crazy story",
            "3 gameplay tutorials and guides",
            &["tutorials"],
            None,
        );
        assert!(!result.is_story);
        for expected in [
            "anti-pattern description: tutorial",
            "anti-pattern description: gameplay",
            "anti-pattern description: guide",
            "anti-pattern tag: tutorial",
        ] {
            assert!(
                result.indicators.contains(&expected.to_string()),
                "missing {expected}"
            );
        }
    }

    #[test]
    fn test_vlog_and_prank_are_not_stories() {
        let classifier = ContentClassifier::default();

        let result = classifier.detect("Storytime", "", &["vlog", "prank"], None);
        assert!(!result.is_story);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(
            result.indicators,
            vec!["title: storytime", "anti-pattern tag: vlog", "anti-pattern tag: prank"]
        );

        let result = classifier.detect("Daily Vlog", "", &["vlog"], None);
        assert!(!result.is_story);
        assert!(result.was_vetoed());
    }

    #[test]
    fn test_contains_inflected() {
        assert!(contains_inflected("new reviews!", "review"));
        assert!(contains_inflected("reviewing it", "review"));
        assert!(contains_inflected("three tutorials", "tutorial"));
        assert!(contains_inflected("he pranked me", "prank"));
        assert!(contains_inflected("music videos", "music video"));
        assert!(!contains_inflected("reviewer", "review"));
        assert!(!contains_inflected("my newsletter", "news"));
        assert!(!contains_inflected("reaction", "react"));
        assert!(!contains_inflected("preview", "review"));
    }
}
