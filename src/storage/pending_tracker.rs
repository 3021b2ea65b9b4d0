// src/storage/pending_tracker.rs
//! Pending-verification tracker.
//!
//! A single durable slot under the fixed storage name `pendingVerification`,
//! recording which certificate the user most recently navigated away to
//! verify. The slot exists from the moment the external issuer page opens
//! until a return is detected; a second departure before the first resolves
//! overwrites the slot, last writer wins.

use crate::error::VerifyError;
use crate::models::status::PendingVerification;
use crate::storage::store::KeyValueStore;
use crate::utils::serialization::{from_json_lenient, to_json};
use std::sync::{Arc, Mutex};

/// Fixed storage name of the pending-verification record.
pub const PENDING_VERIFICATION_KEY: &str = "pendingVerification";

/// Durable single-slot marker for an in-flight verification departure.
pub struct PendingTracker {
    backing: Arc<dyn KeyValueStore>,
    slot: Mutex<Option<PendingVerification>>,
}

impl PendingTracker {
    /// Opens the tracker, loading any persisted pending record.
    /// Malformed persisted text is treated as an empty slot.
    ///
    /// # Errors
    /// Returns `VerifyError::Storage` if the backing store cannot be read.
    pub fn open(backing: Arc<dyn KeyValueStore>) -> Result<Self, VerifyError> {
        let slot = backing
            .read(PENDING_VERIFICATION_KEY)?
            .and_then(|text| from_json_lenient(&text));

        Ok(PendingTracker {
            backing,
            slot: Mutex::new(slot),
        })
    }

    /// Records a departure, unconditionally overwriting any existing
    /// pending record.
    pub fn begin(&self, record: PendingVerification) -> Result<(), VerifyError> {
        let json = to_json(&record)?;
        self.backing.write(PENDING_VERIFICATION_KEY, &json)?;

        let mut slot = self.slot.lock().expect("pending lock poisoned");
        *slot = Some(record);
        Ok(())
    }

    /// Returns the pending record without consuming it.
    pub fn peek(&self) -> Option<PendingVerification> {
        let slot = self.slot.lock().expect("pending lock poisoned");
        slot.clone()
    }

    /// Empties the slot; clearing an empty slot is a no-op.
    pub fn clear(&self) -> Result<(), VerifyError> {
        self.backing.remove(PENDING_VERIFICATION_KEY)?;

        let mut slot = self.slot.lock().expect("pending lock poisoned");
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::MemoryStore;
    use chrono::Utc;

    fn record(key: &str, name: &str, issuer: &str) -> PendingVerification {
        PendingVerification {
            certificate_key: key.to_string(),
            certificate_name: name.to_string(),
            issuer: issuer.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_begin_peek_clear() {
        let tracker = PendingTracker::open(Arc::new(MemoryStore::new())).unwrap();
        assert!(tracker.peek().is_none());

        tracker
            .begin(record("fullstack", "Full Stack Web Development Certificate", "Udemy"))
            .unwrap();
        assert_eq!(tracker.peek().unwrap().certificate_key, "fullstack");

        tracker.clear().unwrap();
        assert!(tracker.peek().is_none());
        tracker.clear().unwrap();
    }

    #[test]
    fn test_second_begin_overwrites_first() {
        let tracker = PendingTracker::open(Arc::new(MemoryStore::new())).unwrap();
        tracker
            .begin(record("fullstack", "Full Stack Web Development Certificate", "Udemy"))
            .unwrap();
        tracker
            .begin(record("react", "React Developer Certification", "Meta"))
            .unwrap();

        let pending = tracker.peek().unwrap();
        assert_eq!(pending.certificate_key, "react");
        assert_eq!(pending.issuer, "Meta");
    }

    #[test]
    fn test_slot_survives_reopen() {
        let shared: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let tracker = PendingTracker::open(shared.clone()).unwrap();
            tracker
                .begin(record("javascript", "JavaScript Algorithms Certificate", "freeCodeCamp"))
                .unwrap();
        }

        let reopened = PendingTracker::open(shared).unwrap();
        assert_eq!(reopened.peek().unwrap().certificate_key, "javascript");
    }

    #[test]
    fn test_corrupt_slot_loads_as_empty() {
        let shared: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        shared.write(PENDING_VERIFICATION_KEY, "[broken").unwrap();

        let tracker = PendingTracker::open(shared).unwrap();
        assert!(tracker.peek().is_none());
    }
}
