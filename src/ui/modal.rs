// src/ui/modal.rs
//! Certificate detail modal.
//!
//! Owns the transient Current-Selection: which certificate is displayed in
//! the modal right now, or none. Set when a card's view control is
//! activated, cleared when the modal closes, never persisted. The modal's
//! verify button participates in the reflection layer through
//! [`ModalVerifyButton`].

use crate::models::certificate::CertificateDescriptor;
use crate::ui::reflection::{ButtonState, RenderTarget};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Everything the open modal displays for one certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalView {
    pub certificate_key: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub course: String,
    pub issuer: String,
    pub date: String,
    pub duration: String,
    pub certificate_id: String,
    pub achievement: String,
    pub seal: String,
    pub verify_button: ButtonState,
}

/// Transient modal state, at most one certificate displayed at a time.
pub struct ModalSession {
    current: Mutex<Option<ModalView>>,
}

impl ModalSession {
    pub fn new() -> Self {
        ModalSession {
            current: Mutex::new(None),
        }
    }

    /// Displays a certificate, replacing any previous selection.
    pub fn open(&self, descriptor: &CertificateDescriptor, verified: bool) -> ModalView {
        let view = ModalView {
            certificate_key: descriptor.key.clone(),
            title: descriptor.title.clone(),
            subtitle: "This certificate is proudly presented to".to_string(),
            description: descriptor.description.clone(),
            course: descriptor.course.clone(),
            issuer: descriptor.issuer.clone(),
            date: descriptor.date.clone(),
            duration: descriptor.duration.clone(),
            certificate_id: descriptor.certificate_id.clone(),
            achievement: descriptor.achievement.clone(),
            seal: descriptor.seal.clone(),
            verify_button: modal_button_state(verified),
        };

        let mut current = self.current.lock().expect("modal lock poisoned");
        *current = Some(view.clone());
        view
    }

    /// Clears the selection.
    pub fn close(&self) {
        let mut current = self.current.lock().expect("modal lock poisoned");
        *current = None;
    }

    /// Snapshot of the displayed view, if the modal is open.
    pub fn current(&self) -> Option<ModalView> {
        self.current.lock().expect("modal lock poisoned").clone()
    }
}

impl Default for ModalSession {
    fn default() -> Self {
        Self::new()
    }
}

fn modal_button_state(verified: bool) -> ButtonState {
    if verified {
        ButtonState {
            label: "Verified".to_string(),
            disabled: true,
        }
    } else {
        ButtonState::new("Verify Certificate")
    }
}

/// Render target driving the open modal's verify button. Matches only while
/// the modal displays that certificate; applying to a closed modal is a
/// no-op.
pub struct ModalVerifyButton {
    session: Arc<ModalSession>,
}

impl ModalVerifyButton {
    pub fn new(session: Arc<ModalSession>) -> Self {
        ModalVerifyButton { session }
    }
}

impl RenderTarget for ModalVerifyButton {
    fn matches(&self, key: &str) -> bool {
        self.session
            .current()
            .map(|view| view.certificate_key == key)
            .unwrap_or(false)
    }

    fn apply(&self, verified: bool) {
        let mut current = self.session.current.lock().expect("modal lock poisoned");
        if let Some(view) = current.as_mut() {
            view.verify_button = modal_button_state(verified);
        }
    }
}
