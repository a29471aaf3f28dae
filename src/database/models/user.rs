use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registered identity. Keyed by `username`; `subscriptions` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub username: String,
    pub subscriptions: Vec<String>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            subscriptions: Vec::new(),
        }
    }
}
