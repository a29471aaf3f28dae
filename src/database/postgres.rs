use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};

use super::models::{ChannelRecord, ItemRecord, UserRecord};
use super::store::{Store, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        username      TEXT PRIMARY KEY,
        subscriptions TEXT[] NOT NULL DEFAULT '{}'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS channels (
        slug    TEXT PRIMARY KEY,
        title   TEXT NOT NULL,
        owner   TEXT,
        items   JSONB NOT NULL DEFAULT '[]'::jsonb,
        version BIGINT NOT NULL DEFAULT 0
    )
    "#,
];

/// Channel row as stored: items are one embedded JSONB document array.
#[derive(FromRow)]
struct ChannelRow {
    slug: String,
    title: String,
    owner: Option<String>,
    items: Json<Vec<ItemRecord>>,
    version: i64,
}

impl From<ChannelRow> for ChannelRecord {
    fn from(row: ChannelRow) -> Self {
        ChannelRecord {
            slug: row.slug,
            title: row.title,
            owner: row.owner,
            items: row.items.0,
            version: row.version,
        }
    }
}

/// PostgreSQL document store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` and `channels` tables if they do not exist
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Surface primary-key violations as `Duplicate` instead of a backend fault.
fn map_insert_error(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(format!("duplicate key: {} already exists", what))
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT username, subscriptions FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &UserRecord) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (username, subscriptions) VALUES ($1, $2)")
            .bind(&user.username)
            .bind(&user.subscriptions)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &format!("user {}", user.username)))?;
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT username, subscriptions FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_channels(&self) -> StoreResult<Vec<ChannelRecord>> {
        let rows = sqlx::query_as::<_, ChannelRow>(
            "SELECT slug, title, owner, items, version FROM channels",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ChannelRecord::from).collect())
    }

    async fn insert_channel(&self, channel: &ChannelRecord) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO channels (slug, title, owner, items, version) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&channel.slug)
        .bind(&channel.title)
        .bind(&channel.owner)
        .bind(Json(&channel.items))
        .bind(channel.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &format!("channel {}", channel.slug)))?;
        Ok(())
    }

    async fn find_channel(&self, slug: &str) -> StoreResult<Option<ChannelRecord>> {
        let row = sqlx::query_as::<_, ChannelRow>(
            "SELECT slug, title, owner, items, version FROM channels WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ChannelRecord::from))
    }

    async fn replace_channel(&self, channel: &ChannelRecord) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE channels
            SET title = $2, owner = $3, items = $4, version = version + 1
            WHERE slug = $1 AND version = $5
            "#,
        )
        .bind(&channel.slug)
        .bind(&channel.title)
        .bind(&channel.owner)
        .bind(Json(&channel.items))
        .bind(channel.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing matched: either the row vanished or its version moved on
        let exists: Option<(i64,)> = sqlx::query_as("SELECT version FROM channels WHERE slug = $1")
            .bind(&channel.slug)
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Err(StoreError::VersionConflict(channel.slug.clone())),
            None => Err(StoreError::NotFound(format!("channel {}", channel.slug))),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
