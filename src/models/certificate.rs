// src/models/certificate.rs
//! Certificate data model.
//!
//! Defines the single record type held by the registry. Certificates are
//! written once and never mutated in place; the only update path is
//! revoke-then-reissue.

use serde::{Deserialize, Serialize};

/// A digital certificate as stored on the ledger.
///
/// The record is an opaque envelope: the registry indexes it by `cert_id`
/// and performs no validation of the hash or issuer label contents.
///
/// # Serialization
/// Stored as a flat JSON mapping with field names exactly `certID`,
/// `studentID`, `certHash`, and `issuer` — the wire schema shared with
/// every other consumer of the ledger namespace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Globally unique certificate identifier; doubles as the ledger key
    #[serde(rename = "certID")]
    pub cert_id: String,

    /// Opaque identifier of the certificate subject
    #[serde(rename = "studentID")]
    pub student_id: String,

    /// Content hash/fingerprint supplied by the caller; not validated
    #[serde(rename = "certHash")]
    pub cert_hash: String,

    /// Issuer label recorded verbatim; distinct from the authorization
    /// check, which uses the caller's organizational identity
    pub issuer: String,
}

impl Certificate {
    /// Builds a certificate record from its four fields.
    pub fn new(student_id: &str, cert_id: &str, cert_hash: &str, issuer: &str) -> Self {
        Certificate {
            cert_id: cert_id.to_string(),
            student_id: student_id.to_string(),
            cert_hash: cert_hash.to_string(),
            issuer: issuer.to_string(),
        }
    }
}
