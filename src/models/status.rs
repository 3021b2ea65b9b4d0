// src/models/status.rs
//! Persisted verification records.
//!
//! Two record shapes survive page reloads: the per-certificate
//! [`VerificationStatus`] map entry and the single-slot
//! [`PendingVerification`] marker. Field names serialize in camelCase,
//! matching the records the site already keeps in origin-scoped storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record that a certificate has been verified.
///
/// Created the first time a certificate transitions to verified and never
/// deleted afterwards; statuses are monotone once set. Entries are keyed by
/// the stable catalog key; the human-readable name is carried inside the
/// record for notifications.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    /// Always true for a stored entry; absence of an entry means unverified
    pub verified: bool,

    /// When the verification flow was resolved
    pub verified_at: DateTime<Utc>,

    /// Issuer name copied at verification time
    pub issuer: String,

    /// Display title copied at verification time
    pub certificate_name: String,
}

/// Durable marker that the user was sent away to verify a certificate and
/// has not been confirmed back yet.
///
/// At most one exists at a time; a second departure overwrites the first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerification {
    /// Stable catalog key of the certificate being verified
    pub certificate_key: String,

    /// Display title, used in the return notification
    pub certificate_name: String,

    /// Issuer the user was redirected to
    pub issuer: String,

    /// When the user departed for the external issuer page
    pub timestamp: DateTime<Utc>,
}
