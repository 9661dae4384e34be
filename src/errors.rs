// src/errors.rs
//! Registry error types.
//!
//! Every failure is surfaced to the caller immediately with a typed kind and
//! a human-readable message. The registry performs no retries and swallows
//! nothing; retry policy belongs to the hosting ledger layer.

use crate::services::identity::IdentityError;
use crate::storage::state_store::StoreError;

/// Failure of a registry operation.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    /// The caller's organization is not permitted to issue or revoke
    #[error("organization {0} is not authorized to manage certificates")]
    Unauthorized(String),

    /// The identity collaborator could not supply a caller identity
    #[error(transparent)]
    AuthExtraction(#[from] IdentityError),

    /// Issue attempted for a certificate ID already on the ledger
    #[error("the certificate {0} already exists")]
    AlreadyExists(String),

    /// Lookup or revoke attempted for an absent certificate ID
    #[error("the certificate {0} does not exist")]
    NotFound(String),

    /// The underlying state store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A record could not be serialized, or a stored value is malformed
    #[error("certificate serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
