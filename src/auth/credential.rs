//! Shared-secret bearer credentials: `Authorization: Bearer <SECRET>:<username>`.
//!
//! WARNING: this scheme is a placeholder. It uses one static secret for every
//! user with no signing or expiry, and exists only to stay compatible with
//! existing clients. Put a real mechanism behind [`IdentityVerifier`] instead.
//!
//! [`IdentityVerifier`]: super::IdentityVerifier

use axum::http::{header, HeaderMap};
use thiserror::Error;

const SCHEME: &str = "Bearer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Malformed authorization: wrong number of parts")]
    WrongPartCount,

    #[error("Malformed authorization: does not start with 'Bearer'")]
    WrongScheme,

    #[error("Malformed authorization: wrong secret")]
    WrongSecret,

    #[error("Malformed authorization: header is not valid text")]
    InvalidEncoding,
}

/// Username a request claims to act as, before registry verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedIdentity(pub String);

/// Parse a non-empty header value. Both split levels must yield exactly two
/// tokens; the username may be empty, which the registry will then reject.
pub fn parse_authorization(value: &str, secret: &str) -> Result<ClaimedIdentity, CredentialError> {
    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 {
        return Err(CredentialError::WrongPartCount);
    }
    if parts[0] != SCHEME {
        return Err(CredentialError::WrongScheme);
    }

    let token: Vec<&str> = parts[1].split(':').collect();
    if token.len() != 2 {
        return Err(CredentialError::WrongPartCount);
    }
    if token[0] != secret {
        return Err(CredentialError::WrongSecret);
    }

    Ok(ClaimedIdentity(token[1].to_string()))
}

/// Credential extractor bound to the configured shared secret
#[derive(Debug, Clone)]
pub struct SharedSecretCredentials {
    secret: String,
}

impl SharedSecretCredentials {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// `Ok(None)` for an anonymous request (header absent or empty).
    pub fn extract(&self, headers: &HeaderMap) -> Result<Option<ClaimedIdentity>, CredentialError> {
        let Some(raw) = headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };
        let value = raw.to_str().map_err(|_| CredentialError::InvalidEncoding)?;
        if value.is_empty() {
            return Ok(None);
        }
        parse_authorization(value, &self.secret).map(Some)
    }
}
