// src/services/identity.rs
//! Caller identity resolution.
//!
//! The hosting runtime knows who invoked the registry; this module models
//! that as a fallible collaborator call so the authorization logic stays
//! composable and testable without a live runtime.

/// The identity collaborator could not supply the caller's organization.
#[derive(thiserror::Error, Debug)]
#[error("failed to resolve caller organization: {0}")]
pub struct IdentityError(pub String);

/// Resolves the organizational identity of the current caller.
///
/// Implementations wrap whatever the transport provides: a membership
/// service credential, a request header, or a fixed value in tests.
pub trait ClientIdentity {
    /// Returns the caller's organization identifier.
    ///
    /// # Errors
    /// Returns [`IdentityError`] when no identity can be extracted for the
    /// current invocation.
    fn org_id(&self) -> Result<String, IdentityError>;
}

/// Identity fixed at construction time.
///
/// Used by tests and by callers whose identity is established once per
/// process rather than per request.
pub struct StaticIdentity {
    org: String,
}

#[allow(dead_code)]
impl StaticIdentity {
    /// Creates an identity that always resolves to `org`.
    pub fn new(org: &str) -> Self {
        StaticIdentity {
            org: org.to_string(),
        }
    }
}

impl ClientIdentity for StaticIdentity {
    fn org_id(&self) -> Result<String, IdentityError> {
        Ok(self.org.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity_resolves() {
        let identity = StaticIdentity::new("Org1MSP");
        assert_eq!(identity.org_id().unwrap(), "Org1MSP");
    }
}
