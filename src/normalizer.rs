//! Metrics normalization
//!
//! This module maps raw platform payloads into canonical `UniversalMetrics`:
//! - Per-platform mapping tables select which raw paths feed which fields
//! - Values are coerced (string-encoded counters, epoch or dated timestamps)
//! - Missing fields take explicit defaults and never fail
//! - Every raw value that was not consumed is kept in `platform_specific`
//!
//! A missing `source_id` is the only failure.

use crate::adapters::{mapping_for, CanonicalField, Coercion};
use crate::error::{ComputeError, ValidationError};
use crate::types::{Platform, RawPlatformRecord, UniversalMetrics};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Normalizer for converting raw platform payloads to universal metrics
pub struct MetricsNormalizer;

impl MetricsNormalizer {
    /// Normalize a raw platform record.
    ///
    /// `fetched_at` is supplied by the caller so that normalizing the same
    /// record twice yields equal values.
    pub fn normalize(
        platform: &Platform,
        raw: &RawPlatformRecord,
        fetched_at: DateTime<Utc>,
    ) -> Result<UniversalMetrics, ValidationError> {
        let mut collected = Collected::default();
        let mut bag = raw.clone();

        for mapping in mapping_for(platform) {
            if collected.is_set(mapping.field) {
                continue;
            }
            let Some(value) = lookup(raw, mapping.path) else {
                continue;
            };
            if collected.apply(mapping.field, value) {
                remove_path(&mut bag, mapping.path);
            }
        }

        let source_id = collected
            .source_id
            .ok_or_else(|| ValidationError::MissingField {
                field: CanonicalField::SourceId.name().to_string(),
            })?;

        Ok(UniversalMetrics {
            platform: platform.clone(),
            source_id,
            view_count: collected.view_count.unwrap_or(0),
            like_count: collected.like_count.unwrap_or(0),
            comment_count: collected.comment_count.unwrap_or(0),
            share_count: collected.share_count.unwrap_or(0),
            favorite_count: collected.favorite_count.unwrap_or(0),
            title: collected.title.unwrap_or_default(),
            description: collected.description.unwrap_or_default(),
            tags: collected.tags.unwrap_or_default(),
            subtitle_text: collected.subtitle_text,
            published_at: collected.published_at,
            fetched_at,
            resolution: collected.resolution,
            fps: collected.fps,
            aspect_ratio: collected.aspect_ratio,
            channel_follower_count: collected.channel_follower_count,
            channel_verified: collected.channel_verified,
            platform_specific: bag,
            derived: None,
        })
    }

    /// Normalize a raw JSON object string
    pub fn normalize_json(
        platform: &Platform,
        raw_json: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<UniversalMetrics, ComputeError> {
        let value: Value = serde_json::from_str(raw_json)?;
        let Value::Object(raw) = value else {
            return Err(ComputeError::ParseError(format!(
                "{platform} payload must be a JSON object"
            )));
        };
        Ok(Self::normalize(platform, &raw, fetched_at)?)
    }
}

/// Canonical values collected while walking a mapping table
#[derive(Debug, Default)]
struct Collected {
    source_id: Option<String>,
    view_count: Option<u64>,
    like_count: Option<u64>,
    comment_count: Option<u64>,
    share_count: Option<u64>,
    favorite_count: Option<u64>,
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    subtitle_text: Option<String>,
    published_at: Option<DateTime<Utc>>,
    resolution: Option<String>,
    fps: Option<f64>,
    aspect_ratio: Option<String>,
    channel_follower_count: Option<u64>,
    channel_verified: Option<bool>,
}

impl Collected {
    fn is_set(&self, field: CanonicalField) -> bool {
        match field {
            CanonicalField::SourceId => self.source_id.is_some(),
            CanonicalField::ViewCount => self.view_count.is_some(),
            CanonicalField::LikeCount => self.like_count.is_some(),
            CanonicalField::CommentCount => self.comment_count.is_some(),
            CanonicalField::ShareCount => self.share_count.is_some(),
            CanonicalField::FavoriteCount => self.favorite_count.is_some(),
            CanonicalField::Title => self.title.is_some(),
            CanonicalField::Description => self.description.is_some(),
            CanonicalField::Tags => self.tags.is_some(),
            CanonicalField::SubtitleText => self.subtitle_text.is_some(),
            CanonicalField::PublishedAt => self.published_at.is_some(),
            CanonicalField::Resolution => self.resolution.is_some(),
            CanonicalField::Fps => self.fps.is_some(),
            CanonicalField::AspectRatio => self.aspect_ratio.is_some(),
            CanonicalField::ChannelFollowerCount => self.channel_follower_count.is_some(),
            CanonicalField::ChannelVerified => self.channel_verified.is_some(),
        }
    }

    /// Coerce `value` into `field`. Returns whether the raw value is fully
    /// represented by the field; otherwise it stays in the platform-specific
    /// bag.
    fn apply(&mut self, field: CanonicalField, value: &Value) -> bool {
        match field.coercion() {
            Coercion::Identifier => set(&mut self.source_id, coerce_identifier(value)),
            Coercion::Count => {
                let slot = match field {
                    CanonicalField::ViewCount => &mut self.view_count,
                    CanonicalField::LikeCount => &mut self.like_count,
                    CanonicalField::CommentCount => &mut self.comment_count,
                    CanonicalField::ShareCount => &mut self.share_count,
                    CanonicalField::FavoriteCount => &mut self.favorite_count,
                    _ => &mut self.channel_follower_count,
                };
                set(slot, coerce_count(value)) && is_exact_count(value)
            }
            Coercion::Text if field == CanonicalField::SubtitleText => set(
                &mut self.subtitle_text,
                coerce_text(value).filter(|text| !text.trim().is_empty()),
            ),
            Coercion::Text => {
                let slot = match field {
                    CanonicalField::Title => &mut self.title,
                    CanonicalField::Description => &mut self.description,
                    CanonicalField::Resolution => &mut self.resolution,
                    _ => &mut self.aspect_ratio,
                };
                set(slot, coerce_text(value))
            }
            Coercion::TagList => match coerce_tags(value) {
                Some((tags, lossless)) => {
                    self.tags = Some(tags);
                    lossless
                }
                None => false,
            },
            Coercion::Timestamp => set(&mut self.published_at, coerce_timestamp(value)),
            Coercion::Float => set(&mut self.fps, coerce_float(value)),
            Coercion::Bool => set(&mut self.channel_verified, coerce_bool(value)),
        }
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

/// Resolve a dot-separated path against a raw record
fn lookup<'a>(raw: &'a RawPlatformRecord, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = raw.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Remove a consumed path from the bag, pruning parents left empty
fn remove_path(bag: &mut RawPlatformRecord, path: &str) {
    match path.split_once('.') {
        None => {
            bag.remove(path);
        }
        Some((head, rest)) => {
            let emptied = match bag.get_mut(head) {
                Some(Value::Object(child)) => {
                    remove_path(child, rest);
                    child.is_empty()
                }
                _ => false,
            };
            if emptied {
                bag.remove(head);
            }
        }
    }
}

fn coerce_identifier(value: &Value) -> Option<String> {
    let id = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else if n.as_i64().is_some() {
                // Negative integers
                Some(0)
            } else {
                n.as_f64().and_then(float_to_count)
            }
        }
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != ',' && *c != '_')
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            match cleaned.parse::<u64>() {
                Ok(v) => Some(v),
                Err(_) => cleaned.parse::<f64>().ok().and_then(float_to_count),
            }
        }
        _ => None,
    }
}

/// Whether a count was given as a non-negative integer, so coercion lost
/// nothing
fn is_exact_count(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_u64().is_some(),
        Value::String(s) => s
            .trim()
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect::<String>()
            .parse::<u64>()
            .is_ok(),
        _ => false,
    }
}

fn float_to_count(v: f64) -> Option<u64> {
    if !v.is_finite() {
        return None;
    }
    Some(if v <= 0.0 { 0 } else { v.trunc() as u64 })
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a tag list; the flag is false when entries had to be dropped
fn coerce_tags(value: &Value) -> Option<(Vec<String>, bool)> {
    let (total, tags): (usize, Vec<String>) = match value {
        Value::Array(items) => (
            items.len(),
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|tag| !tag.is_empty())
                .collect(),
        ),
        Value::String(s) => {
            let segments: Vec<&str> = s.split(',').collect();
            (
                segments.len(),
                segments
                    .into_iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
            )
        }
        _ => return None,
    };
    let lossless = tags.len() == total;
    Some((tags, lossless))
}

fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => DateTime::from_timestamp(secs, 0),
            None => n.as_f64().and_then(epoch_from_float),
        },
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn epoch_from_float(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Parse the timestamp shapes platforms emit
fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    // yt-dlp upload_date: YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Graph API style offsets without a colon: 2023-01-01T00:00:00+0000
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    // Epoch seconds sent as a string
    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    s.parse::<f64>().ok().and_then(epoch_from_float)
}
