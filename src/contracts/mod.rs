// src/contracts/mod.rs

pub mod cert_registry;
