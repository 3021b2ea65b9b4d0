// src/catalog/service.rs
//! Read-only certificate catalog.
//!
//! Maps a stable certificate key to its descriptor. The catalog is built
//! once at startup and never mutated; "not found" is the only failure mode
//! and callers treat it as a no-op with a user-visible notice.

use crate::models::certificate::CertificateDescriptor;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The four certificates of the portfolio site, including their external
/// verification URLs.
static BUILTIN_CERTIFICATES: Lazy<Vec<CertificateDescriptor>> = Lazy::new(|| {
    vec![
        CertificateDescriptor {
            key: "fullstack".to_string(),
            title: "Full Stack Web Development Certificate".to_string(),
            course: "Full Stack Web Development".to_string(),
            issuer: "Udemy".to_string(),
            date: "June 15, 2023".to_string(),
            duration: "120 Hours".to_string(),
            description: "Has successfully completed the Full Stack Web Development course, \
                          demonstrating proficiency in modern web technologies including HTML, \
                          CSS, JavaScript, Node.js, Express, and MongoDB."
                .to_string(),
            skills: vec![
                "HTML5".to_string(),
                "CSS3".to_string(),
                "JavaScript ES6+".to_string(),
                "Node.js".to_string(),
                "Express.js".to_string(),
                "MongoDB".to_string(),
                "REST APIs".to_string(),
                "Git".to_string(),
            ],
            certificate_id: "FSWD20230615".to_string(),
            achievement: "Distinction".to_string(),
            seal: "\u{1F3C6}".to_string(),
            verification_url: Some(
                "https://www.udemy.com/certificate/your-certificate-id-here/".to_string(),
            ),
        },
        CertificateDescriptor {
            key: "react".to_string(),
            title: "React Developer Certification".to_string(),
            course: "React Developer Professional Certificate".to_string(),
            issuer: "Meta".to_string(),
            date: "March 22, 2023".to_string(),
            duration: "80 Hours".to_string(),
            description: "Has demonstrated advanced proficiency in React development, including \
                          hooks, state management, component architecture, and modern React \
                          patterns for building scalable applications."
                .to_string(),
            skills: vec![
                "React".to_string(),
                "Redux".to_string(),
                "React Hooks".to_string(),
                "Context API".to_string(),
                "Component Testing".to_string(),
                "Performance Optimization".to_string(),
            ],
            certificate_id: "RCT20230322".to_string(),
            achievement: "Excellence".to_string(),
            seal: "\u{2B50}".to_string(),
            verification_url: Some(
                "https://coursera.org/verify/your-certificate-id-here".to_string(),
            ),
        },
        CertificateDescriptor {
            key: "javascript".to_string(),
            title: "JavaScript Algorithms Certificate".to_string(),
            course: "JavaScript Algorithms and Data Structures".to_string(),
            issuer: "freeCodeCamp".to_string(),
            date: "January 10, 2023".to_string(),
            duration: "300 Hours".to_string(),
            description: "Has mastered JavaScript algorithms and data structures, demonstrating \
                          exceptional problem-solving skills and technical interview readiness \
                          through comprehensive coding challenges."
                .to_string(),
            skills: vec![
                "Algorithms".to_string(),
                "Data Structures".to_string(),
                "ES6+".to_string(),
                "Problem Solving".to_string(),
                "Big O Notation".to_string(),
                "Recursion".to_string(),
            ],
            certificate_id: "JSALG20230110".to_string(),
            achievement: "Mastery".to_string(),
            seal: "\u{1F48E}".to_string(),
            verification_url: Some(
                "https://freecodecamp.org/certification/your-username/javascript-algorithms-and-data-structures"
                    .to_string(),
            ),
        },
        CertificateDescriptor {
            key: "uiux".to_string(),
            title: "UI/UX Design Specialization Certificate".to_string(),
            course: "UI/UX Design Professional Certificate".to_string(),
            issuer: "Google".to_string(),
            date: "November 30, 2022".to_string(),
            duration: "150 Hours".to_string(),
            description: "Has completed the UI/UX Design Specialization, demonstrating expertise \
                          in user-centered design principles, wireframing, prototyping, and \
                          usability testing methodologies."
                .to_string(),
            skills: vec![
                "Figma".to_string(),
                "User Research".to_string(),
                "Wireframing".to_string(),
                "Prototyping".to_string(),
                "Usability Testing".to_string(),
                "Design Systems".to_string(),
            ],
            certificate_id: "UIUX20221130".to_string(),
            achievement: "Innovation".to_string(),
            seal: "\u{1F3A8}".to_string(),
            verification_url: Some(
                "https://coursera.org/verify/your-specialization-id-here".to_string(),
            ),
        },
    ]
});

/// Immutable registry of certificate descriptors keyed by their stable key.
pub struct CatalogService {
    certificates: HashMap<String, CertificateDescriptor>,
}

impl CatalogService {
    /// Builds the catalog from the built-in certificate set.
    pub fn with_builtin() -> Self {
        Self::from_descriptors(BUILTIN_CERTIFICATES.iter().cloned())
    }

    /// Builds a catalog from an arbitrary descriptor set.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = CertificateDescriptor>) -> Self {
        let certificates = descriptors
            .into_iter()
            .map(|d| (d.key.clone(), d))
            .collect();
        CatalogService { certificates }
    }

    /// Looks up a descriptor by its stable key.
    ///
    /// # Returns
    /// - `Some(&CertificateDescriptor)` if found
    /// - `None` if no certificate carries that key; callers surface a
    ///   notice rather than failing
    pub fn lookup(&self, key: &str) -> Option<&CertificateDescriptor> {
        self.certificates.get(key)
    }

    /// Iterates every descriptor, used to register one card control per
    /// certificate at startup.
    pub fn descriptors(&self) -> impl Iterator<Item = &CertificateDescriptor> {
        self.certificates.values()
    }

    /// Number of certificates in the catalog.
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
