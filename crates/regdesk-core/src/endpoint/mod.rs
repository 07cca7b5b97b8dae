//! Endpoint validation, fingerprinting and verification.

pub mod fingerprint;
pub mod validate;
pub mod verification;

pub use fingerprint::Fingerprint;
pub use validate::{
    is_valid_bearer_token, is_valid_endpoint, is_valid_github_repo_url, normalize_bearer_token,
};
pub use verification::{VerificationFailure, VerificationRecord, VerificationState};
