// src/storage/mod.rs

pub mod memory_ledger;
pub mod state_store;
