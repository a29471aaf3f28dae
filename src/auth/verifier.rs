use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::database::Store;
use crate::error::ApiError;

use super::credential::SharedSecretCredentials;
use super::Identity;

/// Turns request headers into an authenticated identity.
///
/// `Ok(None)` means the request is anonymous; whether that is acceptable is
/// decided per endpoint by the gate. Implementations reject malformed
/// credentials with `BadRequest` and unknown identities with `Unauthorized`.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Identity>, ApiError>;
}

/// Shared-secret credentials checked against the persisted user registry
pub struct RegistryVerifier {
    credentials: SharedSecretCredentials,
    store: Arc<dyn Store>,
}

impl RegistryVerifier {
    pub fn new(credentials: SharedSecretCredentials, store: Arc<dyn Store>) -> Self {
        Self { credentials, store }
    }
}

#[async_trait]
impl IdentityVerifier for RegistryVerifier {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Identity>, ApiError> {
        let claim = match self.credentials.extract(headers) {
            Ok(Some(claim)) => claim,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("Rejected authorization header: {}", e);
                return Err(e.into());
            }
        };

        let username = claim.0;
        match self.store.find_user(&username).await? {
            Some(user) => {
                tracing::debug!("Good token for user {}", user.username);
                Ok(Some(Identity::new(user.username)))
            }
            None => {
                tracing::warn!("Token names unknown user {}", username);
                Err(ApiError::unauthorized(format!("No such user {}", username)))
            }
        }
    }
}
