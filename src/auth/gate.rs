use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::database::models::ChannelRecord;
use crate::error::ApiError;

/// Username resolved from a verified credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}

/// Per-request authentication state, inserted by the auth middleware.
/// A request that never passed through the middleware is anonymous.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Require an authenticated identity
    pub fn force_auth(&self) -> Result<&Identity, ApiError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Not authorized"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Why an upload was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadDenial {
    /// The form names someone other than the caller as uploader
    UploaderMismatch { requested: String },
    /// The channel belongs to someone else
    NotOwner { owner: String },
}

impl std::fmt::Display for UploadDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDenial::UploaderMismatch { requested } => {
                write!(f, "cannot upload on behalf of {}", requested)
            }
            UploadDenial::NotOwner { owner } => write!(f, "channel belongs to {}", owner),
        }
    }
}

/// An explicitly requested uploader must be the caller.
pub fn check_requested_uploader(identity: &Identity, requested: Option<&str>) -> Result<(), UploadDenial> {
    match requested {
        Some(requested) if !requested.is_empty() && requested != identity.as_str() => {
            Err(UploadDenial::UploaderMismatch {
                requested: requested.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Items may be appended to an owned channel only by its owner; channels
/// without an owner accept uploads from any authenticated identity.
pub fn check_channel_upload(identity: &Identity, channel: &ChannelRecord) -> Result<(), UploadDenial> {
    match &channel.owner {
        Some(owner) if owner != identity.as_str() => Err(UploadDenial::NotOwner {
            owner: owner.clone(),
        }),
        _ => Ok(()),
    }
}
