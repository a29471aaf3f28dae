use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored item document, embedded in its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub slug: String,
    pub title: String,
    pub date_uploaded: DateTime<Utc>,
    /// Base64 payload, stored verbatim
    pub data: String,
    pub uploader: String,
}

/// Stored channel document. `version` increments on every successful replace
/// and is what conditional writes compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub slug: String,
    pub title: String,
    pub owner: Option<String>,
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub version: i64,
}

impl ChannelRecord {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, owner: Option<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            owner,
            items: Vec::new(),
            version: 0,
        }
    }

    /// First item with an exactly matching slug, in stored order.
    pub fn find_item(&self, item_slug: &str) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.slug == item_slug)
    }

    pub fn to_view(&self) -> ChannelView {
        ChannelView {
            slug: self.slug.clone(),
            title: self.title.clone(),
            owner: self.owner.clone(),
            items: self.items.iter().map(ItemRecord::to_view).collect(),
        }
    }
}

impl ItemRecord {
    pub fn to_view(&self) -> ItemView {
        ItemView {
            slug: self.slug.clone(),
            title: self.title.clone(),
            date_uploaded: self.date_uploaded,
            uploader: self.uploader.clone(),
        }
    }
}

/// Public item shape; the payload is served separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub slug: String,
    pub title: String,
    pub date_uploaded: DateTime<Utc>,
    pub uploader: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelView {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub items: Vec<ItemView>,
}
