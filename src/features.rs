//! Derived metrics
//!
//! This module derives deterministic analytics from universal metrics:
//! - Engagement and per-counter ratios (percent of views)
//! - Velocity (views per day/hour since upload)
//! - Watch-through, conversion and relative performance
//! - The Universal Content Score blend
//! - The ranking score over ceiling-normalized counters
//! - Content metadata (text lengths, tag count, subtitle availability)
//!
//! Every division has a defined zero-denominator result and the current time
//! is always passed in, so the same inputs always produce the same output.

use crate::types::{
    DerivedMetrics, RpiMetric, ScoreComponents, SupplementalMetrics, UniversalMetrics,
};
use chrono::{DateTime, Utc};

/// UCS weight of the engagement rate
pub const UCS_ENGAGEMENT_WEIGHT: f64 = 0.4;
/// UCS weight of the watch-through rate
pub const UCS_WATCH_THROUGH_WEIGHT: f64 = 0.4;
/// UCS weight of the relative performance index
pub const UCS_RPI_WEIGHT: f64 = 0.2;
/// RPI assumed by UCS when there is no channel baseline ("at median")
pub const UCS_RPI_FALLBACK: f64 = 100.0;

/// Default weights of the view, like and comment components of the ranking
/// score. The engagement component is only weighted when a fourth weight is
/// supplied.
pub const DEFAULT_RANKING_WEIGHTS: [f64; 3] = [1.0, 0.8, 0.6];

const VIEW_SCORE_CEILING: f64 = 1_000_000.0;
const LIKE_SCORE_CEILING: f64 = 50_000.0;
const COMMENT_SCORE_CEILING: f64 = 1_000.0;

/// Calculator for computing derived metrics
pub struct DerivedMetricsCalculator;

impl DerivedMetricsCalculator {
    /// Compute derived metrics for `metrics` as of `now`
    pub fn calculate(
        metrics: &UniversalMetrics,
        supplemental: &SupplementalMetrics,
        now: DateTime<Utc>,
    ) -> DerivedMetrics {
        let views = metrics.view_count;
        let engagements = total_engagements(metrics);

        let engagement_rate = percent_of(engagements, views);
        let watch_through_rate = compute_watch_through_rate(supplemental);
        let relative_performance_index = compute_rpi(metrics, supplemental);

        let days = days_since_upload(metrics.published_at, now) as f64;
        let views_per_day = views as f64 / days;
        let views_per_hour = views as f64 / (days * 24.0);

        let conversion_rate = percent_of(supplemental.conversions.unwrap_or(0), views);

        let universal_content_score = (UCS_ENGAGEMENT_WEIGHT * engagement_rate
            + UCS_WATCH_THROUGH_WEIGHT * watch_through_rate
            + UCS_RPI_WEIGHT * relative_performance_index.unwrap_or(UCS_RPI_FALLBACK))
        .clamp(0.0, 100.0);

        DerivedMetrics {
            engagement_rate: round_half_even(engagement_rate),
            like_to_view_ratio: round_half_even(percent_of(metrics.like_count, views)),
            comment_to_view_ratio: round_half_even(percent_of(metrics.comment_count, views)),
            share_to_view_ratio: round_half_even(percent_of(metrics.share_count, views)),
            views_per_day: round_half_even(views_per_day),
            views_per_hour: round_half_even(views_per_hour),
            watch_through_rate: round_half_even(watch_through_rate),
            conversion_rate: round_half_even(conversion_rate),
            relative_performance_index: relative_performance_index.map(round_half_even),
            universal_content_score: round_half_even(universal_content_score),
            ranking: score_components(metrics, &DEFAULT_RANKING_WEIGHTS),
            title_length: metrics.title.chars().count() as u64,
            description_length: metrics.description.chars().count() as u64,
            tag_count: metrics.tags.len() as u64,
            has_subtitles: metrics.subtitle_text.is_some(),
        }
    }

    /// Compute derived metrics and attach them to the record
    pub fn attach(
        mut metrics: UniversalMetrics,
        supplemental: &SupplementalMetrics,
        now: DateTime<Utc>,
    ) -> UniversalMetrics {
        metrics.derived = Some(Self::calculate(&metrics, supplemental, now));
        metrics
    }
}

/// Whole days between publication and `now`, floored, never below 1.
///
/// Unknown publication dates count as one day so rates stay bounded.
pub fn days_since_upload(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    published_at
        .map(|published| (now - published).num_days())
        .unwrap_or(1)
        .max(1)
}

/// Round to two decimals, ties to even. Non-finite values become 0.
pub fn round_half_even(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round_ties_even() / 100.0
}

/// Ranking score over counters normalized against fixed ceilings.
///
/// Components are weighted in order (view, like, comment, engagement); extra
/// weights are ignored and missing ones weight a component by 0. Saves count
/// as engagement here.
pub fn score_components(metrics: &UniversalMetrics, weights: &[f64]) -> ScoreComponents {
    let view_score = ceiling_ratio(metrics.view_count, VIEW_SCORE_CEILING);
    let like_score = ceiling_ratio(metrics.like_count, LIKE_SCORE_CEILING);
    let comment_score = ceiling_ratio(metrics.comment_count, COMMENT_SCORE_CEILING);

    let engagements = total_engagements(metrics).saturating_add(metrics.favorite_count);
    let engagement_score = percent_of(engagements, metrics.view_count).min(1.0);

    let weighted: f64 = [view_score, like_score, comment_score, engagement_score]
        .iter()
        .zip(weights)
        .map(|(component, weight)| component * weight)
        .sum();
    let final_score = (weighted * 10.0).clamp(0.0, 100.0);

    ScoreComponents {
        view_score: round_half_even(view_score),
        like_score: round_half_even(like_score),
        comment_score: round_half_even(comment_score),
        engagement_score: round_half_even(engagement_score),
        final_score: round_half_even(final_score),
    }
}

fn ceiling_ratio(value: u64, ceiling: f64) -> f64 {
    (value as f64 / ceiling).min(1.0)
}

fn total_engagements(metrics: &UniversalMetrics) -> u64 {
    metrics
        .like_count
        .saturating_add(metrics.comment_count)
        .saturating_add(metrics.share_count)
}

/// numerator / views × 100, or 0 with no views
fn percent_of(numerator: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    numerator as f64 / views as f64 * 100.0
}

/// Average watch time / video length × 100, clipped to 0-100
fn compute_watch_through_rate(supplemental: &SupplementalMetrics) -> f64 {
    match (supplemental.avg_watch_time_secs, supplemental.video_length_secs) {
        (Some(watched), Some(length)) if length > 0.0 && watched.is_finite() => {
            (watched / length * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Selected metric relative to the channel median × 100
fn compute_rpi(metrics: &UniversalMetrics, supplemental: &SupplementalMetrics) -> Option<f64> {
    let median = supplemental.channel_median_metric?;
    if median == 0.0 || !median.is_finite() {
        return None;
    }
    let current = match supplemental.rpi_metric {
        RpiMetric::Views => metrics.view_count,
        RpiMetric::Likes => metrics.like_count,
        RpiMetric::Comments => metrics.comment_count,
        RpiMetric::Shares => metrics.share_count,
        RpiMetric::Engagements => total_engagements(metrics),
    };
    Some(current as f64 / median * 100.0)
}
