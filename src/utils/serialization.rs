// src/utils/serialization.rs
//! Serialization utilities for persisted records.
//!
//! Provides the JSON encode/decode pair used by the storage layer. Decoding
//! is deliberately lenient: persisted text that fails to parse is reported
//! as absent rather than as an error, so a corrupted record degrades to an
//! empty store that the next write repairs.

use crate::error::VerifyError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a record to a JSON string.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Errors
/// Returns `VerifyError::Serialization` if serialization fails.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, VerifyError> {
    Ok(serde_json::to_string(data)?)
}

/// Deserializes a record from persisted JSON text, tolerating corruption.
///
/// # Arguments
/// * `data` - Persisted text to deserialize
///
/// # Returns
/// - `Some(T)` when the text parses as the expected record
/// - `None` when it does not; malformed storage is treated as absent
pub fn from_json_lenient<T: DeserializeOwned>(data: &str) -> Option<T> {
    match serde_json::from_str(data) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding malformed persisted record: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_round_trips_a_map() {
        let mut map = HashMap::new();
        map.insert("fullstack".to_string(), true);

        let json = to_json(&map).unwrap();
        let back: HashMap<String, bool> = from_json_lenient(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_corrupt_text_decodes_as_absent() {
        let parsed: Option<HashMap<String, bool>> = from_json_lenient("{not json");
        assert!(parsed.is_none());

        // Well-formed JSON of the wrong shape is also treated as absent
        let parsed: Option<HashMap<String, bool>> = from_json_lenient("[1, 2, 3]");
        assert!(parsed.is_none());
    }
}
