//! Display records produced by the extraction pipelines.
//!
//! Every record is a flat value built once per fetch. String fields hold
//! `""` when their selector missed; only the three optional [`NewThreads`]
//! fields can be genuinely absent.

use serde::Serialize;

/// A named category grouping of sub-boards on the home view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Block {
    pub name: String,
    pub nodes: Vec<Node>,
}

/// One sub-board summary row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Node {
    pub description: String,
    /// Thread count as displayed, e.g. `"1.2k"`.
    pub post: String,
    /// Message count as displayed.
    pub reply: String,
    pub extra: Extra,
}

/// Latest activity shown beside a sub-board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Extra {
    pub title: String,
    pub avatar: String,
    pub username: String,
    pub time: String,
}

/// A trending article preview on the discover feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrendingContent {
    pub title: String,
    pub content: String,
    pub preview_image: String,
    pub author_name: String,
    pub author_avatar: String,
    pub reply_number: String,
    pub time: String,
}

/// A newly created thread on the discover feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NewThreads {
    pub title: String,
    pub author_name: String,
    pub author_avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub time: String,
}

/// An entry of the resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Resource {
    pub title: String,
    pub sub_title: String,
    pub version: String,
    pub icon: String,
    pub category: String,
    pub label: String,
    pub score: String,
    pub download: String,
    pub author_name: String,
    pub author_avatar: String,
    pub time: String,
}

/// One entry of the aggregated discover feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoverItem {
    Trending(TrendingContent),
    NewThread(NewThreads),
    Resource(Resource),
}

impl DiscoverItem {
    pub fn title(&self) -> &str {
        match self {
            DiscoverItem::Trending(item) => &item.title,
            DiscoverItem::NewThread(item) => &item.title,
            DiscoverItem::Resource(item) => &item.title,
        }
    }
}
