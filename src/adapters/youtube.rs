//! YouTube mapping tables
//!
//! Two shapes are supported: the Data API v3 video resource (nested
//! `snippet`/`statistics` objects with string-encoded counters) and the flat
//! metadata dump produced by yt-dlp for channel uploads.

use super::{map, CanonicalField as F, FieldMapping};

pub(crate) const YOUTUBE_DATA_API: &[FieldMapping] = &[
    map("id", F::SourceId),
    map("snippet.title", F::Title),
    map("snippet.description", F::Description),
    map("snippet.tags", F::Tags),
    map("snippet.publishedAt", F::PublishedAt),
    map("statistics.viewCount", F::ViewCount),
    map("statistics.likeCount", F::LikeCount),
    map("statistics.commentCount", F::CommentCount),
    map("statistics.favoriteCount", F::FavoriteCount),
    // Collected outside the Data API and merged in by the fetch layer
    map("enhanced_metrics.resolution", F::Resolution),
    map("enhanced_metrics.fps", F::Fps),
    map("enhanced_metrics.aspect_ratio", F::AspectRatio),
    map("enhanced_metrics.subtitle_text", F::SubtitleText),
    map("enhanced_metrics.channel_follower_count", F::ChannelFollowerCount),
    map("enhanced_metrics.channel_verified", F::ChannelVerified),
];

pub(crate) const YT_DLP: &[FieldMapping] = &[
    map("id", F::SourceId),
    map("display_id", F::SourceId),
    map("title", F::Title),
    map("fulltitle", F::Title),
    map("description", F::Description),
    map("tags", F::Tags),
    map("view_count", F::ViewCount),
    map("like_count", F::LikeCount),
    map("comment_count", F::CommentCount),
    map("repost_count", F::ShareCount),
    map("upload_date", F::PublishedAt),
    map("timestamp", F::PublishedAt),
    map("resolution", F::Resolution),
    map("fps", F::Fps),
    map("aspect_ratio", F::AspectRatio),
    map("subtitle_text", F::SubtitleText),
    map("channel_follower_count", F::ChannelFollowerCount),
    map("channel_is_verified", F::ChannelVerified),
];
