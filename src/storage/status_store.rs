// src/storage/status_store.rs
//! Persistent verification status store.
//!
//! Keeps the durable map of certificate key to [`VerificationStatus`] under
//! the fixed storage name `verifiedCertificates`. The store is monotone: a
//! certificate can be marked verified but never unmarked, and re-marking an
//! already-verified certificate only refreshes the timestamp and issuer.
//!
//! Statuses are keyed by the stable catalog key rather than the
//! human-readable title, so a retitled certificate keeps its status.

use crate::error::VerifyError;
use crate::models::status::VerificationStatus;
use crate::storage::store::KeyValueStore;
use crate::utils::serialization::{from_json_lenient, to_json};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Fixed storage name of the verified-certificates record.
pub const VERIFIED_CERTIFICATES_KEY: &str = "verifiedCertificates";

/// Durable map of certificate key to verification status.
///
/// Reads are served from an in-memory cache loaded once at construction;
/// every mutation is written through to the backing store immediately, so
/// the persisted record survives reloads and process exits.
pub struct StatusStore {
    backing: Arc<dyn KeyValueStore>,
    entries: RwLock<HashMap<String, VerificationStatus>>,
}

impl StatusStore {
    /// Opens the store, loading any persisted record.
    ///
    /// Malformed persisted text is treated as an empty store; the next
    /// write overwrites it.
    ///
    /// # Errors
    /// Returns `VerifyError::Storage` if the backing store cannot be read.
    pub fn open(backing: Arc<dyn KeyValueStore>) -> Result<Self, VerifyError> {
        let entries = backing
            .read(VERIFIED_CERTIFICATES_KEY)?
            .and_then(|text| from_json_lenient(&text))
            .unwrap_or_default();

        Ok(StatusStore {
            backing,
            entries: RwLock::new(entries),
        })
    }

    /// Returns whether the certificate has been verified; an absent entry
    /// counts as false.
    pub fn is_verified(&self, key: &str) -> bool {
        let entries = self.entries.read().expect("status lock poisoned");
        entries.get(key).map(|s| s.verified).unwrap_or(false)
    }

    /// Returns the stored status record for a certificate, if any.
    pub fn get(&self, key: &str) -> Option<VerificationStatus> {
        let entries = self.entries.read().expect("status lock poisoned");
        entries.get(key).cloned()
    }

    /// Returns the keys of every verified certificate, for page-load
    /// rendering.
    pub fn verified_keys(&self) -> Vec<String> {
        let entries = self.entries.read().expect("status lock poisoned");
        entries
            .iter()
            .filter(|(_, status)| status.verified)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Marks a certificate as verified and persists the record.
    ///
    /// Idempotent: re-marking an already-verified certificate overwrites
    /// the timestamp and issuer, status stays true. No unmark operation
    /// exists.
    ///
    /// # Errors
    /// Returns `VerifyError` if the record cannot be serialized or written.
    pub fn mark_verified(
        &self,
        key: &str,
        certificate_name: &str,
        issuer: &str,
        at: DateTime<Utc>,
    ) -> Result<(), VerifyError> {
        let mut entries = self.entries.write().expect("status lock poisoned");
        entries.insert(
            key.to_string(),
            VerificationStatus {
                verified: true,
                verified_at: at,
                issuer: issuer.to_string(),
                certificate_name: certificate_name.to_string(),
            },
        );

        let json = to_json(&*entries)?;
        self.backing.write(VERIFIED_CERTIFICATES_KEY, &json)
    }
}
