// src/contracts/cert_registry.rs
//! Certificate registry contract logic.
//!
//! The access-controlled mutation surface over the ledger state store.
//! Only the authorized issuing organization may create or revoke records;
//! any caller may read, verify, and enumerate them. The registry itself is
//! stateless: the injected store is the single source of truth.

use crate::errors::RegistryError;
use crate::models::certificate::Certificate;
use crate::services::identity::ClientIdentity;
use crate::storage::state_store::{StateIterator, StateStore};
use std::collections::HashSet;

/// Issuing authority policy.
///
/// Holds the set of organizations permitted to issue and revoke
/// certificates. Injected at registry construction so the allowed set is
/// configuration, not logic, and extending to multiple issuers needs no
/// code change.
#[derive(Debug, Clone)]
pub struct IssuerPolicy {
    allowed: HashSet<String>,
}

impl IssuerPolicy {
    /// Policy permitting exactly one organization.
    pub fn single(org: &str) -> Self {
        IssuerPolicy {
            allowed: HashSet::from([org.to_string()]),
        }
    }

    /// Policy permitting every organization in `orgs`.
    pub fn allowing<I: IntoIterator<Item = String>>(orgs: I) -> Self {
        IssuerPolicy {
            allowed: orgs.into_iter().collect(),
        }
    }

    /// Returns `true` if `org` may issue and revoke certificates.
    pub fn permits(&self, org: &str) -> bool {
        self.allowed.contains(org)
    }
}

/// Certificate registry over a ledger state store.
///
/// Provides the five public operations:
/// - Issue a new certificate (authorized issuer only)
/// - Verify a certificate's existence
/// - Fetch a certificate record
/// - Enumerate all certificates
/// - Revoke a certificate (authorized issuer only)
///
/// # Type Parameters
/// * `S` - Ledger state store implementation (e.g., `MemoryLedger`)
pub struct CertRegistry<S> {
    /// Injected ledger state store; owns all persistent state
    store: S,
    /// Organizations permitted to issue and revoke
    policy: IssuerPolicy,
}

impl<S> CertRegistry<S>
where
    S: StateStore,
{
    /// Creates a registry over `store` gated by `policy`.
    pub fn new(store: S, policy: IssuerPolicy) -> Self {
        CertRegistry { store, policy }
    }

    /// Checks that the caller is a permitted issuing organization.
    ///
    /// Pure predicate with no side effects; runs before any state mutation.
    ///
    /// # Errors
    /// - `AuthExtraction` if the identity collaborator cannot supply an org
    /// - `Unauthorized` if the org is not in the issuer policy
    fn check_authorized(&self, identity: &dyn ClientIdentity) -> Result<(), RegistryError> {
        let org = identity.org_id()?;
        if self.policy.permits(&org) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized(org))
        }
    }

    /// Issues a new certificate.
    ///
    /// # Arguments
    /// * `identity` - Identity collaborator for the current invocation
    /// * `student_id` - Subject identifier, stored verbatim
    /// * `cert_id` - Unique certificate ID; becomes the ledger key
    /// * `cert_hash` - Opaque content hash, stored verbatim
    /// * `issuer` - Issuer label, stored verbatim
    ///
    /// # Errors
    /// - `Unauthorized` / `AuthExtraction` if the caller fails the issuer check
    /// - `AlreadyExists` if `cert_id` is already on the ledger
    /// - `Store` / `Serialization` on collaborator failure
    ///
    /// On any failure nothing is written.
    pub fn issue_certificate(
        &self,
        identity: &dyn ClientIdentity,
        student_id: &str,
        cert_id: &str,
        cert_hash: &str,
        issuer: &str,
    ) -> Result<(), RegistryError> {
        self.check_authorized(identity)?;

        if self.certificate_exists(cert_id)? {
            return Err(RegistryError::AlreadyExists(cert_id.to_string()));
        }

        let certificate = Certificate::new(student_id, cert_id, cert_hash, issuer);
        let bytes = serde_json::to_vec(&certificate)?;
        self.store.put(cert_id, &bytes)?;

        log::info!("issued certificate {} for student {}", cert_id, student_id);
        Ok(())
    }

    /// Reports whether a certificate exists under `cert_id`.
    ///
    /// Open to any caller. Existence only — record contents are not exposed.
    ///
    /// # Errors
    /// `Store` on collaborator failure.
    pub fn verify_certificate(&self, cert_id: &str) -> Result<bool, RegistryError> {
        self.certificate_exists(cert_id)
    }

    /// Fetches the certificate record stored under `cert_id`.
    ///
    /// Open to any caller.
    ///
    /// # Errors
    /// - `NotFound` if no certificate exists under `cert_id`
    /// - `Store` on collaborator failure
    /// - `Serialization` if the stored value is malformed
    pub fn get_certificate(&self, cert_id: &str) -> Result<Certificate, RegistryError> {
        let bytes = self
            .store
            .get(cert_id)?
            .ok_or_else(|| RegistryError::NotFound(cert_id.to_string()))?;
        let certificate = serde_json::from_slice(&bytes)?;
        Ok(certificate)
    }

    /// Enumerates every certificate on the ledger.
    ///
    /// Scans the entire namespace and returns records in lexicographic
    /// `cert_id` order, not issuance order. Scan isolation is whatever the
    /// store provides; the registry adds no guarantee of its own. An empty
    /// ledger yields an empty vector.
    ///
    /// # Errors
    /// - `Store` if the scan cannot be opened or advanced
    /// - `Serialization` if any single entry is malformed; the whole
    ///   enumeration aborts with no partial results
    pub fn get_all_certificates(&self) -> Result<Vec<Certificate>, RegistryError> {
        let mut scan = self.store.range_scan("", "")?;
        let result = Self::collect_certificates(scan.as_mut());
        // Cursor is released on every path, including the error ones
        scan.close();
        result
    }

    fn collect_certificates(
        scan: &mut dyn StateIterator,
    ) -> Result<Vec<Certificate>, RegistryError> {
        let mut certificates = Vec::new();
        while let Some((_, value)) = scan.next_entry()? {
            let certificate: Certificate = serde_json::from_slice(&value)?;
            certificates.push(certificate);
        }
        Ok(certificates)
    }

    /// Revokes the certificate stored under `cert_id`.
    ///
    /// Revocation is physical deletion — there is no status field — and is
    /// irreversible through this interface. Existence is checked before
    /// authorization, matching the registry's long-standing error
    /// precedence: revoking an absent ID reports `NotFound` whoever asks.
    ///
    /// # Errors
    /// - `NotFound` if no certificate exists under `cert_id`
    /// - `Unauthorized` / `AuthExtraction` if the caller fails the issuer check
    /// - `Store` on collaborator failure
    pub fn revoke_certificate(
        &self,
        identity: &dyn ClientIdentity,
        cert_id: &str,
    ) -> Result<(), RegistryError> {
        if !self.certificate_exists(cert_id)? {
            return Err(RegistryError::NotFound(cert_id.to_string()));
        }

        self.check_authorized(identity)?;

        self.store.delete(cert_id)?;
        log::info!("revoked certificate {}", cert_id);
        Ok(())
    }

    /// Probes the store for `cert_id`. Shared by verify, issue, and revoke.
    fn certificate_exists(&self, cert_id: &str) -> Result<bool, RegistryError> {
        Ok(self.store.get(cert_id)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity::{IdentityError, StaticIdentity};
    use crate::storage::memory_ledger::MemoryLedger;

    const ISSUER_ORG: &str = "Org1MSP";

    /// Identity collaborator that always fails extraction.
    struct BrokenIdentity;

    impl ClientIdentity for BrokenIdentity {
        fn org_id(&self) -> Result<String, IdentityError> {
            Err(IdentityError("no credential in context".into()))
        }
    }

    fn registry() -> (CertRegistry<MemoryLedger>, MemoryLedger) {
        let ledger = MemoryLedger::new();
        let registry = CertRegistry::new(ledger.clone(), IssuerPolicy::single(ISSUER_ORG));
        (registry, ledger)
    }

    fn university() -> StaticIdentity {
        StaticIdentity::new(ISSUER_ORG)
    }

    fn outsider() -> StaticIdentity {
        StaticIdentity::new("Org2MSP")
    }

    #[test]
    fn test_issue_then_read_back() {
        let (registry, _) = registry();

        registry
            .issue_certificate(&university(), "S1", "C1", "abc123", "UniA")
            .unwrap();

        let cert = registry.get_certificate("C1").unwrap();
        assert_eq!(cert.cert_id, "C1");
        assert_eq!(cert.student_id, "S1");
        assert_eq!(cert.cert_hash, "abc123");
        assert_eq!(cert.issuer, "UniA");
    }

    #[test]
    fn test_duplicate_issue_rejected_and_original_kept() {
        let (registry, _) = registry();

        registry
            .issue_certificate(&university(), "S1", "C1", "abc123", "UniA")
            .unwrap();
        let err = registry
            .issue_certificate(&university(), "S2", "C1", "other", "UniB")
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists(id) if id == "C1"));

        // The original record is untouched
        let cert = registry.get_certificate("C1").unwrap();
        assert_eq!(cert.student_id, "S1");
        assert_eq!(cert.cert_hash, "abc123");
    }

    #[test]
    fn test_unauthorized_issue_leaves_ledger_unchanged() {
        let (registry, ledger) = registry();

        let err = registry
            .issue_certificate(&outsider(), "S1", "C1", "abc123", "UniA")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized(org) if org == "Org2MSP"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_identity_extraction_failure_blocks_issue() {
        let (registry, ledger) = registry();

        let err = registry
            .issue_certificate(&BrokenIdentity, "S1", "C1", "abc123", "UniA")
            .unwrap_err();
        assert!(matches!(err, RegistryError::AuthExtraction(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_verify_tracks_issue_and_revoke() {
        let (registry, _) = registry();

        assert!(!registry.verify_certificate("C1").unwrap());

        registry
            .issue_certificate(&university(), "S1", "C1", "abc123", "UniA")
            .unwrap();
        assert!(registry.verify_certificate("C1").unwrap());

        registry.revoke_certificate(&university(), "C1").unwrap();
        assert!(!registry.verify_certificate("C1").unwrap());
    }

    #[test]
    fn test_get_missing_certificate() {
        let (registry, _) = registry();

        let err = registry.get_certificate("C404").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(id) if id == "C404"));
    }

    #[test]
    fn test_revoke_is_final() {
        let (registry, ledger) = registry();

        registry
            .issue_certificate(&university(), "S1", "C1", "abc123", "UniA")
            .unwrap();
        registry.revoke_certificate(&university(), "C1").unwrap();

        assert!(matches!(
            registry.get_certificate("C1").unwrap_err(),
            RegistryError::NotFound(_)
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unauthorized_revoke_leaves_record() {
        let (registry, ledger) = registry();

        registry
            .issue_certificate(&university(), "S1", "C1", "abc123", "UniA")
            .unwrap();

        let err = registry.revoke_certificate(&outsider(), "C1").unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_revoke_missing_reports_not_found_before_auth() {
        let (registry, _) = registry();

        // Existence precedes the issuer check: even an unauthorized caller
        // revoking an absent ID sees NotFound, not Unauthorized
        let err = registry.revoke_certificate(&outsider(), "C404").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(id) if id == "C404"));
    }

    #[test]
    fn test_enumeration_in_key_order() {
        let (registry, _) = registry();
        let issuer = university();

        registry
            .issue_certificate(&issuer, "S3", "C3", "h3", "UniA")
            .unwrap();
        registry
            .issue_certificate(&issuer, "S1", "C1", "h1", "UniA")
            .unwrap();
        registry
            .issue_certificate(&issuer, "S2", "C2", "h2", "UniA")
            .unwrap();

        let ids: Vec<String> = registry
            .get_all_certificates()
            .unwrap()
            .into_iter()
            .map(|c| c.cert_id)
            .collect();
        assert_eq!(ids, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_enumeration_reflects_revocation() {
        let (registry, _) = registry();
        let issuer = university();

        registry
            .issue_certificate(&issuer, "S1", "C1", "h1", "UniA")
            .unwrap();
        registry
            .issue_certificate(&issuer, "S2", "C2", "h2", "UniA")
            .unwrap();
        registry.revoke_certificate(&issuer, "C1").unwrap();

        let ids: Vec<String> = registry
            .get_all_certificates()
            .unwrap()
            .into_iter()
            .map(|c| c.cert_id)
            .collect();
        assert_eq!(ids, vec!["C2"]);
    }

    #[test]
    fn test_empty_ledger_enumerates_empty() {
        let (registry, _) = registry();
        assert!(registry.get_all_certificates().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_record_aborts_enumeration() {
        let ledger = MemoryLedger::new();
        ledger.put("C1", b"{not json").unwrap();
        let registry = CertRegistry::new(ledger.clone(), IssuerPolicy::single(ISSUER_ORG));

        registry
            .issue_certificate(&university(), "S2", "C2", "h2", "UniA")
            .unwrap();

        // One bad entry fails the whole scan; no partial results
        let err = registry.get_all_certificates().unwrap_err();
        assert!(matches!(err, RegistryError::Serialization(_)));
    }

    #[test]
    fn test_multi_issuer_policy() {
        let ledger = MemoryLedger::new();
        let policy =
            IssuerPolicy::allowing(["Org1MSP".to_string(), "Org3MSP".to_string()]);
        let registry = CertRegistry::new(ledger, policy);

        registry
            .issue_certificate(&StaticIdentity::new("Org3MSP"), "S1", "C1", "h1", "UniC")
            .unwrap();
        assert!(registry.verify_certificate("C1").unwrap());

        let err = registry
            .issue_certificate(&StaticIdentity::new("Org2MSP"), "S2", "C2", "h2", "UniB")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized(_)));
    }
}
