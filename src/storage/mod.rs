// src/storage/mod.rs
//! Durable storage layer: the key-value seam plus the two persisted records
//! of the verification subsystem.

pub mod pending_tracker;
pub mod status_store;
pub mod store;
