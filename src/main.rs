// src/main.rs

//! # Certificate Registry - Main Entry Point
//!
//! Wires the registry components together and starts the HTTP API:
//! 1. **Storage Layer**: in-memory ordered ledger (stand-in for the real
//!    ledger collaborator)
//! 2. **Contract Layer**: access-controlled certificate registry
//! 3. **Services Layer**: Axum API server
//!
//! ## Environment Variables
//! - `AUTHORIZED_ISSUER`: organization permitted to issue/revoke
//!   (default: Org1MSP)
//! - `BIND_ADDR`: listen address for the API (default: 127.0.0.1:3000)

use crate::contracts::cert_registry::{CertRegistry, IssuerPolicy};
use crate::services::api_server::ApiServer;
use crate::storage::memory_ledger::MemoryLedger;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod contracts; // Registry contract logic
mod errors; // Typed operation failures
mod models; // Data structures
mod services; // Identity resolution and HTTP API
mod storage; // Ledger state store

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    let authorized_issuer =
        std::env::var("AUTHORIZED_ISSUER").unwrap_or_else(|_| "Org1MSP".to_string());
    let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;

    log::info!("authorized issuing organization: {}", authorized_issuer);

    let ledger = MemoryLedger::new();
    let registry = CertRegistry::new(ledger, IssuerPolicy::single(&authorized_issuer));
    let api_server = Arc::new(ApiServer::new(registry));

    api_server.run(bind_addr).await?;
    Ok(())
}
