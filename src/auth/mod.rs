//! Request authentication: credential extraction, identity verification and
//! the per-endpoint authorization gate.

pub mod credential;
pub mod gate;
pub mod verifier;

pub use credential::{parse_authorization, ClaimedIdentity, CredentialError, SharedSecretCredentials};
pub use gate::{check_channel_upload, check_requested_uploader, Identity, RequestContext, UploadDenial};
pub use verifier::{IdentityVerifier, RegistryVerifier};
