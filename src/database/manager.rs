use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

use super::memory::MemoryStore;
use super::models::UserRecord;
use super::postgres::PgStore;
use super::store::{Store, StoreError};

/// Errors raised while opening the store at startup
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),

    #[error("Could not connect to database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Could not prepare database: {0}")]
    Store(#[from] StoreError),
}

/// Builds the process-wide store handle from configuration
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the configured backend, create its schema and insert seed users.
    /// Falls back to the memory backend when no host or URL is configured.
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        let store: Arc<dyn Store> = match config.connection_url()? {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.connection_timeout))
                    .connect(&url)
                    .await?;
                let store = PgStore::new(pool);
                store.migrate().await?;
                info!("Connected to PostgreSQL database '{}'", config.name);
                Arc::new(store)
            }
            None => {
                warn!("No DATABASE_URL or DATABASE_HOST set; using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        Self::seed_users(store.as_ref(), &config.seed_users).await?;
        Ok(store)
    }

    /// Insert each username that is not registered yet
    pub async fn seed_users(store: &dyn Store, usernames: &[String]) -> Result<(), StoreError> {
        for username in usernames {
            if store.find_user(username).await?.is_some() {
                continue;
            }
            match store.insert_user(&UserRecord::new(username.as_str())).await {
                Ok(()) => info!("Seeded user {}", username),
                // Lost a race with another process seeding the same name
                Err(StoreError::Duplicate(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
