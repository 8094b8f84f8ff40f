//! Pipeline orchestration
//!
//! This module provides the public batch API for Content Flux.
//! It chains the stages from a raw platform record to an encoded output
//! record and owns the per-record skip policy for batches.

use crate::classifier::{ClassifierConfig, ContentClassifier};
use crate::encoder::{EncodedRecord, RecordEncoder};
use crate::error::ComputeError;
use crate::features::DerivedMetricsCalculator;
use crate::normalizer::MetricsNormalizer;
use crate::types::{Platform, RawPlatformRecord, SupplementalMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "content_flux::pipeline";

/// Processor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub classifier: ClassifierConfig,
    /// Run the story classifier on every record
    pub classify: bool,
    /// Drop records not classified as stories (implies `classify`)
    pub story_only: bool,
    /// Drop null/empty values from the metrics blob
    pub compact: bool,
}

impl ProcessorConfig {
    /// Load configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One raw record plus the caller-supplied context needed to process it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub platform: Platform,
    pub record: RawPlatformRecord,
    #[serde(default)]
    pub supplemental: SupplementalMetrics,
}

/// A record that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the input batch
    pub index: usize,
    pub platform: Platform,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub records: Vec<EncodedRecord>,
    pub skipped: Vec<SkippedRecord>,
    /// Records dropped by the story-only filter
    pub filtered: usize,
}

/// Stateless processor chaining normalization, derivation, classification
/// and encoding
#[derive(Debug, Clone)]
pub struct ContentProcessor {
    classifier: ContentClassifier,
    encoder: RecordEncoder,
    classify: bool,
    story_only: bool,
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl ContentProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            classifier: ContentClassifier::new(config.classifier),
            encoder: if config.compact {
                RecordEncoder::compact()
            } else {
                RecordEncoder::new()
            },
            classify: config.classify || config.story_only,
            story_only: config.story_only,
        }
    }

    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    /// Process one raw record.
    ///
    /// Returns `Ok(None)` when the story-only filter drops the record.
    pub fn process(
        &self,
        platform: &Platform,
        raw: &RawPlatformRecord,
        supplemental: &SupplementalMetrics,
        fetched_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<EncodedRecord>, ComputeError> {
        let metrics = MetricsNormalizer::normalize(platform, raw, fetched_at)?;
        let metrics = DerivedMetricsCalculator::attach(metrics, supplemental, now);

        let classification = self
            .classify
            .then(|| self.classifier.detect_metrics(&metrics));

        if self.story_only && !classification.as_ref().is_some_and(|c| c.is_story) {
            return Ok(None);
        }

        self.encoder.encode(&metrics, classification).map(Some)
    }

    /// Process a batch, skipping records that fail validation.
    ///
    /// Record-level failures are logged and reported; encoding failures abort
    /// the batch.
    pub fn process_batch(
        &self,
        envelopes: &[RawEnvelope],
        fetched_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<BatchReport, ComputeError> {
        let mut report = BatchReport::default();

        for (index, envelope) in envelopes.iter().enumerate() {
            match self.process(
                &envelope.platform,
                &envelope.record,
                &envelope.supplemental,
                fetched_at,
                now,
            ) {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => report.filtered += 1,
                Err(e) if e.is_record_level() => {
                    log::warn!(
                        target: LOG_TARGET,
                        "Skipping {} record at index {index}: {e}",
                        envelope.platform
                    );
                    report.skipped.push(SkippedRecord {
                        index,
                        platform: envelope.platform.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            target: LOG_TARGET,
            "Processed batch of {}: {} encoded, {} skipped, {} filtered",
            envelopes.len(),
            report.records.len(),
            report.skipped.len(),
            report.filtered
        );

        Ok(report)
    }

    /// Parse newline-delimited envelopes, skipping blank lines
    pub fn parse_ndjson(input: &str) -> Result<Vec<RawEnvelope>, ComputeError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line.trim()).map_err(|e| {
                    ComputeError::ParseError(format!("line {}: {e}", n + 1))
                })
            })
            .collect()
    }
}

/// Normalize, derive and encode one raw JSON record with default settings.
///
/// # Example
/// ```ignore
/// let json = metrics_from_json("reddit", raw_json, fetched_at, now)?;
/// ```
pub fn metrics_from_json(
    platform: &str,
    raw_json: &str,
    fetched_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<String, ComputeError> {
    let platform = Platform::from_tag(platform);
    let metrics = MetricsNormalizer::normalize_json(&platform, raw_json, fetched_at)?;
    let metrics =
        DerivedMetricsCalculator::attach(metrics, &SupplementalMetrics::default(), now);
    RecordEncoder::new().encode_to_json(&metrics, None)
}
