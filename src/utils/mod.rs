// src/utils/mod.rs
//! Helper functions shared across modules.

pub mod serialization;
