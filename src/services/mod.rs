// src/services/mod.rs

pub mod api_server;
pub mod identity;
