//! In-process store backend, used when no database host is configured and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{ChannelRecord, UserRecord};
use super::store::{Store, StoreError, StoreResult};

/// Thread-safe via `RwLock`. Not persistent; data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    channels: RwLock<HashMap<String, ChannelRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert_user(&self, user: &UserRecord) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::Duplicate(format!(
                "duplicate key: user {} already exists",
                user.username
            )));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn list_channels(&self) -> StoreResult<Vec<ChannelRecord>> {
        Ok(self.channels.read().await.values().cloned().collect())
    }

    async fn insert_channel(&self, channel: &ChannelRecord) -> StoreResult<()> {
        let mut channels = self.channels.write().await;
        if channels.contains_key(&channel.slug) {
            return Err(StoreError::Duplicate(format!(
                "duplicate key: channel {} already exists",
                channel.slug
            )));
        }
        channels.insert(channel.slug.clone(), channel.clone());
        Ok(())
    }

    async fn find_channel(&self, slug: &str) -> StoreResult<Option<ChannelRecord>> {
        Ok(self.channels.read().await.get(slug).cloned())
    }

    async fn replace_channel(&self, channel: &ChannelRecord) -> StoreResult<()> {
        let mut channels = self.channels.write().await;
        let stored = channels
            .get_mut(&channel.slug)
            .ok_or_else(|| StoreError::NotFound(format!("channel {}", channel.slug)))?;

        if stored.version != channel.version {
            return Err(StoreError::VersionConflict(channel.slug.clone()));
        }

        *stored = ChannelRecord {
            version: channel.version + 1,
            ..channel.clone()
        };
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
