//! Reddit mapping table (listing `data` objects)
//!
//! Reddit has no like counter; the net score stands in for it, with raw
//! upvotes as a fallback when the score is hidden.

use super::{map, CanonicalField as F, FieldMapping};

pub(crate) const REDDIT: &[FieldMapping] = &[
    map("id", F::SourceId),
    map("name", F::SourceId),
    map("title", F::Title),
    map("selftext", F::Description),
    map("num_views", F::ViewCount),
    map("view_count", F::ViewCount),
    map("score", F::LikeCount),
    map("ups", F::LikeCount),
    map("num_comments", F::CommentCount),
    map("num_crossposts", F::ShareCount),
    map("created_utc", F::PublishedAt),
    map("subreddit_subscribers", F::ChannelFollowerCount),
];
