use async_trait::async_trait;
use thiserror::Error;

use super::models::{ChannelRecord, UserRecord};

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Primary-key uniqueness violation on insert
    #[error("{0}")]
    Duplicate(String),

    /// Conditional replace lost against a concurrent writer
    #[error("Channel '{0}' was modified concurrently")]
    VersionConflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted user registry and channel documents.
///
/// One handle is built at startup and shared by every request. A channel is
/// the unit of atomicity: items are only changed by replacing the whole
/// record through [`Store::replace_channel`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    /// Fails with [`StoreError::Duplicate`] when the username exists.
    async fn insert_user(&self, user: &UserRecord) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>>;

    async fn list_channels(&self) -> StoreResult<Vec<ChannelRecord>>;

    /// Fails with [`StoreError::Duplicate`] when the slug exists.
    async fn insert_channel(&self, channel: &ChannelRecord) -> StoreResult<()>;

    async fn find_channel(&self, slug: &str) -> StoreResult<Option<ChannelRecord>>;

    /// Replace the stored record with the same slug, but only if its version
    /// still equals `channel.version`. On success the stored version is
    /// incremented. Fails with [`StoreError::VersionConflict`] on a stale
    /// version and [`StoreError::NotFound`] when the slug is gone.
    async fn replace_channel(&self, channel: &ChannelRecord) -> StoreResult<()>;

    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> StoreResult<()>;
}
