//! Platform field-mapping tables
//!
//! Each supported platform declares which raw payload paths feed which
//! canonical `UniversalMetrics` fields. Paths are dot-separated for nested
//! objects (`statistics.viewCount`). When several paths feed the same field,
//! the first one that coerces successfully wins; the rest stay in the
//! `platform_specific` bag.

mod generic;
mod reddit;
mod social;
mod youtube;

use crate::types::Platform;

/// Canonical `UniversalMetrics` field a raw path can be mapped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    SourceId,
    ViewCount,
    LikeCount,
    CommentCount,
    ShareCount,
    FavoriteCount,
    Title,
    Description,
    Tags,
    SubtitleText,
    PublishedAt,
    Resolution,
    Fps,
    AspectRatio,
    ChannelFollowerCount,
    ChannelVerified,
}

/// Type coercion applied to a raw value before it lands in a canonical field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Non-negative integer; numeric strings accepted
    Count,
    /// Non-empty identifier; numbers are stringified
    Identifier,
    Text,
    /// Array of strings or a comma-separated string
    TagList,
    /// Date, datetime or unix epoch seconds
    Timestamp,
    Float,
    Bool,
}

impl CanonicalField {
    pub fn coercion(self) -> Coercion {
        match self {
            CanonicalField::SourceId => Coercion::Identifier,
            CanonicalField::ViewCount
            | CanonicalField::LikeCount
            | CanonicalField::CommentCount
            | CanonicalField::ShareCount
            | CanonicalField::FavoriteCount
            | CanonicalField::ChannelFollowerCount => Coercion::Count,
            CanonicalField::Title
            | CanonicalField::Description
            | CanonicalField::SubtitleText
            | CanonicalField::Resolution
            | CanonicalField::AspectRatio => Coercion::Text,
            CanonicalField::Tags => Coercion::TagList,
            CanonicalField::PublishedAt => Coercion::Timestamp,
            CanonicalField::Fps => Coercion::Float,
            CanonicalField::ChannelVerified => Coercion::Bool,
        }
    }

    /// Canonical field name as it appears on `UniversalMetrics`
    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::SourceId => "source_id",
            CanonicalField::ViewCount => "view_count",
            CanonicalField::LikeCount => "like_count",
            CanonicalField::CommentCount => "comment_count",
            CanonicalField::ShareCount => "share_count",
            CanonicalField::FavoriteCount => "favorite_count",
            CanonicalField::Title => "title",
            CanonicalField::Description => "description",
            CanonicalField::Tags => "tags",
            CanonicalField::SubtitleText => "subtitle_text",
            CanonicalField::PublishedAt => "published_at",
            CanonicalField::Resolution => "resolution",
            CanonicalField::Fps => "fps",
            CanonicalField::AspectRatio => "aspect_ratio",
            CanonicalField::ChannelFollowerCount => "channel_follower_count",
            CanonicalField::ChannelVerified => "channel_verified",
        }
    }
}

/// One row of a platform mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Dot-separated path into the raw payload
    pub path: &'static str,
    pub field: CanonicalField,
}

pub(crate) const fn map(path: &'static str, field: CanonicalField) -> FieldMapping {
    FieldMapping { path, field }
}

/// Mapping table for a platform; unknown platforms use the generic table
pub fn mapping_for(platform: &Platform) -> &'static [FieldMapping] {
    match platform {
        Platform::Youtube => youtube::YOUTUBE_DATA_API,
        Platform::YoutubeChannel => youtube::YT_DLP,
        Platform::Reddit => reddit::REDDIT,
        Platform::Tiktok => social::TIKTOK,
        Platform::Instagram => social::INSTAGRAM,
        Platform::Facebook => social::FACEBOOK,
        Platform::Other(_) => generic::GENERIC,
    }
}
