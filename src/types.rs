//! Core types for the Content Flux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw platform records, universal metrics, derived metrics and
//! classification results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Untyped platform payload as produced by a fetch collaborator
pub type RawPlatformRecord = serde_json::Map<String, serde_json::Value>;

/// Content platform tag for provenance and mapping-table selection
///
/// Serialized as the bare tag; deserialization goes through
/// [`Platform::from_tag`] so tags are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    /// YouTube Data API v3 video resource
    Youtube,
    /// yt-dlp metadata dump for a channel upload
    YoutubeChannel,
    Reddit,
    Tiktok,
    Instagram,
    Facebook,
    /// Any other platform; mapped through the generic table
    Other(String),
}

impl Platform {
    /// Resolve a short platform tag, falling back to `Other` for unknown tags
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "youtube" => Platform::Youtube,
            "youtube_channel" => Platform::YoutubeChannel,
            "reddit" => Platform::Reddit,
            "tiktok" => Platform::Tiktok,
            "instagram" => Platform::Instagram,
            "facebook" => Platform::Facebook,
            _ => Platform::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Youtube => "youtube",
            Platform::YoutubeChannel => "youtube_channel",
            Platform::Reddit => "reddit",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Platform {
    fn from(tag: &str) -> Self {
        Platform::from_tag(tag)
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        if tag.trim().is_empty() {
            return Err("platform tag must not be empty".to_string());
        }
        Ok(Platform::from_tag(&tag))
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Canonical, platform-agnostic representation of one piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversalMetrics {
    /// Source platform
    pub platform: Platform,
    /// Stable platform identifier (never empty)
    pub source_id: String,

    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub favorite_count: u64,

    pub title: String,
    pub description: String,
    /// Tags/hashtags in the order the platform returned them
    pub tags: Vec<String>,
    /// Transcript or caption text, when collected
    pub subtitle_text: Option<String>,

    /// When the content was published
    pub published_at: Option<DateTime<Utc>>,
    /// When the raw record was fetched (supplied by the caller)
    pub fetched_at: DateTime<Utc>,

    /// Video resolution (e.g. "1920x1080")
    pub resolution: Option<String>,
    /// Frames per second
    pub fps: Option<f64>,
    /// Aspect ratio as reported by the platform (e.g. "9:16" or "0.56")
    pub aspect_ratio: Option<String>,

    /// Channel subscribers/followers
    pub channel_follower_count: Option<u64>,
    pub channel_verified: Option<bool>,

    /// Raw fields not mapped into the canonical schema, keyed as received
    pub platform_specific: serde_json::Map<String, serde_json::Value>,

    /// Derived analytics, absent until the calculator runs
    pub derived: Option<DerivedMetrics>,
}

/// Deterministic analytics computed from `UniversalMetrics`
///
/// Every value is rounded to two decimals using round-half-even.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// (likes + comments + shares) / views × 100
    pub engagement_rate: f64,
    pub like_to_view_ratio: f64,
    pub comment_to_view_ratio: f64,
    pub share_to_view_ratio: f64,
    pub views_per_day: f64,
    pub views_per_hour: f64,
    /// Average watch time / video length × 100, clipped to 0-100
    pub watch_through_rate: f64,
    pub conversion_rate: f64,
    /// Metric relative to the channel median × 100; null without a baseline
    pub relative_performance_index: Option<f64>,
    /// Weighted blend of engagement, watch-through and RPI (0-100)
    pub universal_content_score: f64,
    /// Ranking score and its normalized components
    pub ranking: ScoreComponents,

    /// Title length in characters
    pub title_length: u64,
    /// Description length in characters
    pub description_length: u64,
    pub tag_count: u64,
    pub has_subtitles: bool,
}

/// Counters normalized against fixed ceilings and blended into a 0-100
/// ranking score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// Views / 1M, capped at 1
    pub view_score: f64,
    /// Likes / 50K, capped at 1
    pub like_score: f64,
    /// Comments / 1K, capped at 1
    pub comment_score: f64,
    /// Engagement fraction × 100, capped at 1
    pub engagement_score: f64,
    /// Weighted component sum × 10, capped at 100
    pub final_score: f64,
}

/// Counter that the relative performance index compares against the channel median
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpiMetric {
    #[default]
    Views,
    Likes,
    Comments,
    Shares,
    /// likes + comments + shares
    Engagements,
}

/// Optional inputs that are not always collectible and so live outside
/// `UniversalMetrics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplementalMetrics {
    /// Average watch time (seconds)
    pub avg_watch_time_secs: Option<f64>,
    /// Video length (seconds)
    pub video_length_secs: Option<f64>,
    /// Subscribes, follows, clicks or signups attributed to the content
    pub conversions: Option<u64>,
    /// Channel median of `rpi_metric`
    pub channel_median_metric: Option<f64>,
    pub rpi_metric: RpiMetric,
}

/// Result of story classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_story: bool,
    /// Positive-signal strength (0-1); not reset by an anti-pattern veto
    pub confidence: f64,
    /// Signals that fired, in channel evaluation order
    pub indicators: Vec<String>,
}

impl ClassificationResult {
    /// Whether a story-like result was overridden by an anti-pattern
    pub fn was_vetoed(&self) -> bool {
        self.indicators
            .iter()
            .any(|indicator| indicator.starts_with(crate::classifier::ANTI_PATTERN_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_platform_tags() {
        assert_eq!(Platform::from_tag("youtube_channel"), Platform::YoutubeChannel);
        assert_eq!(Platform::from_tag(" Reddit "), Platform::Reddit);
        assert_eq!(
            Platform::from_tag("twitch"),
            Platform::Other("twitch".to_string())
        );
        assert_eq!(Platform::Other("kick".to_string()).as_str(), "kick");
    }

    #[test]
    fn test_platform_serializes_as_bare_tag() {
        let json = serde_json::to_string(&Platform::YoutubeChannel).unwrap();
        assert_eq!(json, "\"youtube_channel\"");

        let other: Platform = serde_json::from_str("\"twitch\"").unwrap();
        assert_eq!(other, Platform::Other("twitch".to_string()));

        let known: Platform = serde_json::from_str("\"tiktok\"").unwrap();
        assert_eq!(known, Platform::Tiktok);

        let other = serde_json::to_string(&Platform::Other("kick".to_string())).unwrap();
        assert_eq!(other, "\"kick\"");
    }

    #[test]
    fn test_platform_deserializes_case_insensitively() {
        let platform: Platform = serde_json::from_str("\"Reddit\"").unwrap();
        assert_eq!(platform, Platform::Reddit);

        let platform: Platform = serde_json::from_str("\" YouTube_Channel \"").unwrap();
        assert_eq!(platform, Platform::YoutubeChannel);
    }

    #[test]
    fn test_empty_platform_tag_rejected() {
        let err = serde_json::from_str::<Platform>("\"  \"").unwrap_err();
        assert!(err.to_string().contains("platform tag must not be empty"));
    }

    #[test]
    fn test_supplemental_defaults_from_partial_json() {
        let supplemental: SupplementalMetrics =
            serde_json::from_str(r#"{"video_length_secs": 60.0}"#).unwrap();
        assert_eq!(supplemental.video_length_secs, Some(60.0));
        assert_eq!(supplemental.avg_watch_time_secs, None);
        assert_eq!(supplemental.rpi_metric, RpiMetric::Views);
    }
}
