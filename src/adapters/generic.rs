//! Generic mapping table for platforms without a dedicated table
//!
//! Expects payloads that already use canonical field names.

use super::{map, CanonicalField as F, FieldMapping};

pub(crate) const GENERIC: &[FieldMapping] = &[
    map("source_id", F::SourceId),
    map("id", F::SourceId),
    map("title", F::Title),
    map("description", F::Description),
    map("tags", F::Tags),
    map("view_count", F::ViewCount),
    map("like_count", F::LikeCount),
    map("comment_count", F::CommentCount),
    map("share_count", F::ShareCount),
    map("favorite_count", F::FavoriteCount),
    map("subtitle_text", F::SubtitleText),
    map("published_at", F::PublishedAt),
    map("upload_date", F::PublishedAt),
    map("timestamp", F::PublishedAt),
    map("resolution", F::Resolution),
    map("fps", F::Fps),
    map("aspect_ratio", F::AspectRatio),
    map("channel_follower_count", F::ChannelFollowerCount),
    map("channel_verified", F::ChannelVerified),
];
