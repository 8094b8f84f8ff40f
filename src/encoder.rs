//! Output encoding
//!
//! This module encodes processed records into JSON-compatible output records
//! for a persistence collaborator: identity, a top-level sortable score and
//! the full metrics structure as an opaque blob.

use crate::error::ComputeError;
use crate::types::{ClassificationResult, Platform, UniversalMetrics};
use crate::{FLUX_VERSION, PRODUCER_NAME};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output record handed to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedRecord {
    pub source_id: String,
    pub platform: Platform,
    /// Sortable score (the engagement rate; 0 before derived metrics exist)
    pub score: f64,
    /// Full `UniversalMetrics` structure
    pub metrics: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,
    pub producer: String,
    pub producer_version: String,
}

/// Encoder for producing output records
#[derive(Debug, Clone, Default)]
pub struct RecordEncoder {
    compact: bool,
}

impl RecordEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder that drops null and empty values from the metrics blob
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Encode a record with its optional classification
    pub fn encode(
        &self,
        metrics: &UniversalMetrics,
        classification: Option<ClassificationResult>,
    ) -> Result<EncodedRecord, ComputeError> {
        let mut blob = serde_json::to_value(metrics)
            .map_err(|e| ComputeError::EncodingError(e.to_string()))?;
        if self.compact {
            prune_empty(&mut blob);
        }

        Ok(EncodedRecord {
            source_id: metrics.source_id.clone(),
            platform: metrics.platform.clone(),
            score: metrics
                .derived
                .as_ref()
                .map(|d| d.engagement_rate)
                .unwrap_or(0.0),
            metrics: blob,
            classification,
            producer: PRODUCER_NAME.to_string(),
            producer_version: FLUX_VERSION.to_string(),
        })
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        metrics: &UniversalMetrics,
        classification: Option<ClassificationResult>,
    ) -> Result<String, ComputeError> {
        let record = self.encode(metrics, classification)?;
        serde_json::to_string(&record).map_err(ComputeError::JsonError)
    }
}

/// Remove nulls, empty arrays and empty objects from the top level
fn prune_empty(blob: &mut Value) {
    if let Value::Object(map) = blob {
        map.retain(|_, v| match v {
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            Value::Object(inner) => !inner.is_empty(),
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DerivedMetrics;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn make_test_metrics() -> UniversalMetrics {
        UniversalMetrics {
            platform: Platform::Reddit,
            source_id: "t3_abc".to_string(),
            view_count: 200,
            like_count: 10,
            comment_count: 4,
            share_count: 0,
            favorite_count: 0,
            title: "TIFU".to_string(),
            description: String::new(),
            tags: Vec::new(),
            subtitle_text: None,
            published_at: None,
            fetched_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            resolution: None,
            fps: None,
            aspect_ratio: None,
            channel_follower_count: None,
            channel_verified: None,
            platform_specific: serde_json::Map::new(),
            derived: Some(DerivedMetrics {
                engagement_rate: 7.0,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_score_surfaces_engagement_rate() {
        let encoder = RecordEncoder::new();
        let record = encoder.encode(&make_test_metrics(), None).unwrap();

        assert_eq!(record.source_id, "t3_abc");
        assert_eq!(record.platform, Platform::Reddit);
        assert_eq!(record.score, 7.0);
        assert_eq!(record.metrics["derived"]["engagement_rate"], 7.0);
        assert_eq!(record.producer, PRODUCER_NAME);
    }

    #[test]
    fn test_score_defaults_without_derived() {
        let mut metrics = make_test_metrics();
        metrics.derived = None;
        let record = RecordEncoder::new().encode(&metrics, None).unwrap();
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_metrics_blob_round_trips() {
        let metrics = make_test_metrics();
        let record = RecordEncoder::new().encode(&metrics, None).unwrap();
        let decoded: UniversalMetrics = serde_json::from_value(record.metrics).unwrap();
        assert_eq!(decoded, metrics);
    }

    #[test]
    fn test_compact_drops_empty_fields() {
        let record = RecordEncoder::compact()
            .encode(&make_test_metrics(), None)
            .unwrap();
        let blob = record.metrics.as_object().unwrap();

        assert!(!blob.contains_key("published_at"));
        assert!(!blob.contains_key("tags"));
        assert!(!blob.contains_key("platform_specific"));
        assert!(blob.contains_key("view_count"));
        assert!(blob.contains_key("description"));
    }

    #[test]
    fn test_classification_serialized_when_present() {
        let classification = ClassificationResult {
            is_story: true,
            confidence: 0.3,
            indicators: vec!["title: tifu".to_string()],
        };
        let encoder = RecordEncoder::new();

        let json = encoder
            .encode_to_json(&make_test_metrics(), Some(classification))
            .unwrap();
        assert!(json.contains("\"classification\""));

        let json = encoder.encode_to_json(&make_test_metrics(), None).unwrap();
        assert!(!json.contains("\"classification\""));
    }
}
