// src/error.rs
//! Error types for the certificate verification system.
//!
//! Nothing in this subsystem is fatal to the application: configuration and
//! environment problems degrade to a user-facing notification, and storage
//! corruption is treated as an absent record. The variants here cover the
//! only failures that genuinely propagate, the durable storage layer.

use thiserror::Error;

/// Errors surfaced by the verification subsystem.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The durable key-value store could not be read or written.
    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),

    /// A record could not be serialized for persistence.
    ///
    /// The reverse direction (malformed persisted text) is never an error:
    /// it decodes leniently to "absent" and is overwritten on the next write.
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}
