// src/services/api_server.rs
//! HTTP API for the certificate registry.
//!
//! Thin Axum front over the registry contract logic. Endpoints:
//! - POST   /certificates            — issue a certificate
//! - GET    /certificates            — enumerate all certificates
//! - GET    /certificates/:id        — fetch one certificate
//! - GET    /certificates/verify/:id — existence check
//! - DELETE /certificates/:id        — revoke a certificate
//!
//! The caller's organization is taken from the `x-org-id` request header;
//! in a full deployment that extraction belongs to the membership layer,
//! and this header stands in for it.

use crate::contracts::cert_registry::CertRegistry;
use crate::errors::RegistryError;
use crate::models::certificate::Certificate;
use crate::services::identity::{ClientIdentity, IdentityError};
use crate::storage::memory_ledger::MemoryLedger;
use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

// API request and response structures

/// Request payload for issuing a certificate; field names match the
/// stored wire schema
#[derive(Serialize, Deserialize)]
struct IssueCertificateRequest {
    #[serde(rename = "studentID")]
    student_id: String,
    #[serde(rename = "certID")]
    cert_id: String,
    #[serde(rename = "certHash")]
    cert_hash: String,
    issuer: String,
}

/// Response for issue and revoke operations
#[derive(Serialize, Deserialize)]
struct MutationResponse {
    #[serde(rename = "certID")]
    cert_id: String,
    status: String,
}

/// Response for the existence check
#[derive(Serialize, Deserialize)]
struct VerifyResponse {
    #[serde(rename = "certID")]
    cert_id: String,
    verified: bool,
}

/// Error payload returned for every failed request
#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Caller identity extracted from the `x-org-id` request header.
struct HeaderIdentity {
    org: Option<String>,
}

impl HeaderIdentity {
    fn from_headers(headers: &HeaderMap) -> Self {
        let org = headers
            .get("x-org-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        HeaderIdentity { org }
    }
}

impl ClientIdentity for HeaderIdentity {
    fn org_id(&self) -> Result<String, IdentityError> {
        self.org
            .clone()
            .ok_or_else(|| IdentityError("missing x-org-id header".into()))
    }
}

/// HTTP server exposing the registry operations.
pub struct ApiServer {
    registry: CertRegistry<MemoryLedger>,
}

impl ApiServer {
    /// Creates a server over an initialized registry.
    pub fn new(registry: CertRegistry<MemoryLedger>) -> Self {
        ApiServer { registry }
    }

    /// Builds the route table.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route(
                "/certificates",
                get(Self::get_all_handler).post(Self::issue_handler),
            )
            .route(
                "/certificates/:id",
                get(Self::get_handler).delete(Self::revoke_handler),
            )
            .route("/certificates/verify/:id", get(Self::verify_handler))
            .with_state(self)
    }

    /// Binds `addr` and serves requests until the process exits.
    pub async fn run(self: Arc<Self>, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("certificate registry API listening on http://{}", addr);
        axum::serve(listener, self.router()).await
    }

    /// Issues a new certificate
    ///
    /// # Endpoint
    /// POST /certificates
    ///
    /// # Responses
    /// - 201 Created: certificate written
    /// - 401/403: identity missing or not the authorized issuer
    /// - 409 Conflict: certificate ID already exists
    async fn issue_handler(
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
        Json(payload): Json<IssueCertificateRequest>,
    ) -> impl IntoResponse {
        let identity = HeaderIdentity::from_headers(&headers);
        match state.registry.issue_certificate(
            &identity,
            &payload.student_id,
            &payload.cert_id,
            &payload.cert_hash,
            &payload.issuer,
        ) {
            Ok(()) => (
                StatusCode::CREATED,
                Json(MutationResponse {
                    cert_id: payload.cert_id,
                    status: "issued".to_string(),
                }),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Enumerates all certificates in certificate-ID order
    ///
    /// # Endpoint
    /// GET /certificates
    async fn get_all_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        match state.registry.get_all_certificates() {
            Ok(certificates) => {
                (StatusCode::OK, Json::<Vec<Certificate>>(certificates)).into_response()
            }
            Err(e) => error_response(e),
        }
    }

    /// Fetches one certificate record
    ///
    /// # Endpoint
    /// GET /certificates/:id
    async fn get_handler(
        Path(cert_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.registry.get_certificate(&cert_id) {
            Ok(certificate) => (StatusCode::OK, Json(certificate)).into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Reports whether a certificate exists
    ///
    /// # Endpoint
    /// GET /certificates/verify/:id
    async fn verify_handler(
        Path(cert_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.registry.verify_certificate(&cert_id) {
            Ok(verified) => {
                (StatusCode::OK, Json(VerifyResponse { cert_id, verified })).into_response()
            }
            Err(e) => error_response(e),
        }
    }

    /// Revokes a certificate
    ///
    /// # Endpoint
    /// DELETE /certificates/:id
    ///
    /// # Responses
    /// - 200 OK: certificate deleted
    /// - 404 Not Found: no such certificate (reported before the issuer check)
    /// - 401/403: identity missing or not the authorized issuer
    async fn revoke_handler(
        Path(cert_id): Path<String>,
        State(state): State<Arc<ApiServer>>,
        headers: HeaderMap,
    ) -> impl IntoResponse {
        let identity = HeaderIdentity::from_headers(&headers);
        match state.registry.revoke_certificate(&identity, &cert_id) {
            Ok(()) => (
                StatusCode::OK,
                Json(MutationResponse {
                    cert_id,
                    status: "revoked".to_string(),
                }),
            )
                .into_response(),
            Err(e) => error_response(e),
        }
    }
}

/// Maps a registry failure to an HTTP status plus error payload.
fn error_response(err: RegistryError) -> axum::response::Response {
    let status = match err {
        RegistryError::AuthExtraction(_) => StatusCode::UNAUTHORIZED,
        RegistryError::Unauthorized(_) => StatusCode::FORBIDDEN,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::AlreadyExists(_) => StatusCode::CONFLICT,
        RegistryError::Store(_) | RegistryError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    log::warn!("request failed: {}", err);
    (status, Json(ErrorResponse { error: err.to_string() })).into_response()
}
