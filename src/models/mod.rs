// src/models/mod.rs
//! Data structures shared across the verification subsystem.

pub mod certificate;
pub mod status;
