//! TikTok, Instagram and Facebook mapping tables

use super::{map, CanonicalField as F, FieldMapping};

/// TikTok web item structure
pub(crate) const TIKTOK: &[FieldMapping] = &[
    map("id", F::SourceId),
    map("title", F::Title),
    map("desc", F::Description),
    map("hashtags", F::Tags),
    map("stats.playCount", F::ViewCount),
    map("stats.diggCount", F::LikeCount),
    map("stats.commentCount", F::CommentCount),
    map("stats.shareCount", F::ShareCount),
    map("stats.collectCount", F::FavoriteCount),
    map("createTime", F::PublishedAt),
    map("video.ratio", F::Resolution),
    map("subtitle_text", F::SubtitleText),
    map("authorStats.followerCount", F::ChannelFollowerCount),
    map("author.verified", F::ChannelVerified),
];

/// Instagram Graph API media object
pub(crate) const INSTAGRAM: &[FieldMapping] = &[
    map("id", F::SourceId),
    map("shortcode", F::SourceId),
    map("title", F::Title),
    map("caption", F::Description),
    map("hashtags", F::Tags),
    map("play_count", F::ViewCount),
    map("video_view_count", F::ViewCount),
    map("like_count", F::LikeCount),
    map("comments_count", F::CommentCount),
    map("share_count", F::ShareCount),
    map("saved_count", F::FavoriteCount),
    map("timestamp", F::PublishedAt),
    map("owner.followers_count", F::ChannelFollowerCount),
    map("owner.is_verified", F::ChannelVerified),
];

/// Facebook Graph API post object
pub(crate) const FACEBOOK: &[FieldMapping] = &[
    map("id", F::SourceId),
    map("story", F::Title),
    map("message", F::Description),
    map("views", F::ViewCount),
    map("likes.summary.total_count", F::LikeCount),
    map("reactions.summary.total_count", F::LikeCount),
    map("comments.summary.total_count", F::CommentCount),
    map("shares.count", F::ShareCount),
    map("created_time", F::PublishedAt),
    map("from.followers_count", F::ChannelFollowerCount),
];
