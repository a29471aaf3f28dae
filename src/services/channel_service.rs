use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::{check_channel_upload, check_requested_uploader, Identity, UploadDenial};
use crate::database::models::{ChannelRecord, ItemRecord};
use crate::database::{Store, StoreError};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Channel {0} already exists")]
    DuplicateChannel(String),

    #[error("No such channel {0}")]
    ChannelNotFound(String),

    #[error("Channel {channel} has no item {item}")]
    ItemNotFound { channel: String, item: String },

    #[error("User {user} may not upload to channel {channel}: {denial}")]
    UploadForbidden {
        user: String,
        channel: String,
        denial: UploadDenial,
    },

    #[error("Channel {slug} kept changing during {attempts} append attempts")]
    WriteContention { slug: String, attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Item fields supplied by the uploader
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub slug: String,
    pub title: String,
    /// Base64 payload, stored as given
    pub data: String,
    /// Uploader named by the client, if any; must be the caller
    pub uploader: Option<String>,
}

/// Channel and item operations over the shared store handle
#[derive(Clone)]
pub struct ChannelService {
    store: Arc<dyn Store>,
    append_max_attempts: usize,
}

impl ChannelService {
    pub fn new(store: Arc<dyn Store>, append_max_attempts: usize) -> Self {
        Self {
            store,
            append_max_attempts: append_max_attempts.max(1),
        }
    }

    /// Every channel as slug -> title
    pub async fn list_channels(&self) -> Result<BTreeMap<String, String>, ChannelError> {
        let channels = self.store.list_channels().await?;
        Ok(channels.into_iter().map(|c| (c.slug, c.title)).collect())
    }

    pub async fn create_channel(
        &self,
        slug: &str,
        title: &str,
        owner: Option<&Identity>,
    ) -> Result<(), ChannelError> {
        if slug.is_empty() {
            return Err(ChannelError::EmptyField("slug"));
        }
        if title.is_empty() {
            return Err(ChannelError::EmptyField("title"));
        }

        let channel = ChannelRecord::new(slug, title, owner.map(|o| o.as_str().to_string()));
        match self.store.insert_channel(&channel).await {
            Ok(()) => {
                info!("Created channel {}", slug);
                Ok(())
            }
            Err(StoreError::Duplicate(_)) => Err(ChannelError::DuplicateChannel(slug.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_channel(&self, slug: &str) -> Result<ChannelRecord, ChannelError> {
        self.store
            .find_channel(slug)
            .await?
            .ok_or_else(|| ChannelError::ChannelNotFound(slug.to_string()))
    }

    /// Items of a channel as item slug -> title. Later duplicates win.
    pub async fn list_items(&self, slug: &str) -> Result<BTreeMap<String, String>, ChannelError> {
        let channel = self.get_channel(slug).await?;
        Ok(channel
            .items
            .into_iter()
            .map(|item| (item.slug, item.title))
            .collect())
    }

    /// Append an item as `uploader` and return its resource path.
    ///
    /// The whole channel is fetched, extended and written back conditionally
    /// on the version that was read. A lost race restarts the cycle, so
    /// concurrent appends to one channel all survive.
    pub async fn append_item(
        &self,
        channel_slug: &str,
        new_item: NewItem,
        uploader: &Identity,
    ) -> Result<String, ChannelError> {
        if new_item.slug.is_empty() {
            return Err(ChannelError::EmptyField("itemSlug"));
        }
        if new_item.title.is_empty() {
            return Err(ChannelError::EmptyField("title"));
        }
        check_requested_uploader(uploader, new_item.uploader.as_deref())
            .map_err(|denial| self.forbidden(uploader, channel_slug, denial))?;

        let item = ItemRecord {
            slug: new_item.slug,
            title: new_item.title,
            date_uploaded: Utc::now(),
            data: new_item.data,
            uploader: uploader.as_str().to_string(),
        };
        let location = format!("/channel/{}/item/{}", channel_slug, item.slug);

        for attempt in 1..=self.append_max_attempts {
            let mut channel = self.get_channel(channel_slug).await?;
            check_channel_upload(uploader, &channel)
                .map_err(|denial| self.forbidden(uploader, channel_slug, denial))?;

            channel.items.push(item.clone());
            match self.store.replace_channel(&channel).await {
                Ok(()) => {
                    info!("User {} added item {} to channel {}", uploader, item.slug, channel_slug);
                    return Ok(location);
                }
                Err(StoreError::VersionConflict(_)) => {
                    debug!("Append to channel {} conflicted on attempt {}", channel_slug, attempt);
                }
                Err(StoreError::NotFound(_)) => {
                    return Err(ChannelError::ChannelNotFound(channel_slug.to_string()))
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ChannelError::WriteContention {
            slug: channel_slug.to_string(),
            attempts: self.append_max_attempts,
        })
    }

    /// First item with a matching slug, in stored order
    pub async fn get_item(&self, channel_slug: &str, item_slug: &str) -> Result<ItemRecord, ChannelError> {
        let channel = self.get_channel(channel_slug).await?;
        channel
            .find_item(item_slug)
            .cloned()
            .ok_or_else(|| ChannelError::ItemNotFound {
                channel: channel_slug.to_string(),
                item: item_slug.to_string(),
            })
    }

    /// Base64 payload of an item
    pub async fn get_item_data(&self, channel_slug: &str, item_slug: &str) -> Result<String, ChannelError> {
        Ok(self.get_item(channel_slug, item_slug).await?.data)
    }

    fn forbidden(&self, uploader: &Identity, channel_slug: &str, denial: UploadDenial) -> ChannelError {
        warn!("Refused upload by {} to channel {}: {}", uploader, channel_slug, denial);
        ChannelError::UploadForbidden {
            user: uploader.as_str().to_string(),
            channel: channel_slug.to_string(),
            denial,
        }
    }
}
