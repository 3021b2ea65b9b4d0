// src/models/certificate.rs
//! Certificate descriptor data model.
//!
//! Defines the static, catalog-owned description of a single certificate:
//! its identity key, display fields, and the external issuer page where it
//! can be verified.

use serde::{Deserialize, Serialize};

/// Static description of one certificate in the catalog.
///
/// Descriptors are immutable for the lifetime of the session; mutable state
/// (verified yes/no, pending flows) lives in the storage layer, keyed by
/// [`CertificateDescriptor::key`].
///
/// # Fields
/// - `key`: stable identity key, unique within the catalog
/// - `verification_url`: external issuer page, `None` when the issuer offers
///   no online verification
///
/// # Serialization
/// Serialized with camelCase field names to match the site's JSON records.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDescriptor {
    /// Stable identity key
    /// Example: "fullstack"
    pub key: String,

    /// Human-readable certificate title
    /// Example: "Full Stack Web Development Certificate"
    pub title: String,

    /// Course or category the certificate was earned in
    pub course: String,

    /// Issuing organization
    /// Example: "Udemy"
    pub issuer: String,

    /// Issue date as displayed on the certificate
    /// Example: "June 15, 2023"
    pub date: String,

    /// Course duration as displayed on the certificate
    /// Example: "120 Hours"
    pub duration: String,

    /// Long-form description shown in the detail view
    pub description: String,

    /// Skill tags covered by the certificate
    pub skills: Vec<String>,

    /// Issuer-assigned certificate identifier
    /// Example: "FSWD20230615"
    pub certificate_id: String,

    /// Achievement grade shown as a badge
    /// Example: "Distinction"
    pub achievement: String,

    /// Decorative seal glyph
    pub seal: String,

    /// External verification URL, absent when verification is unsupported
    pub verification_url: Option<String>,
}

impl CertificateDescriptor {
    /// Returns true when the issuer offers an online verification page.
    pub fn supports_verification(&self) -> bool {
        self.verification_url.is_some()
    }
}
