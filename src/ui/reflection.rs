// src/ui/reflection.rs
//! UI reflection layer.
//!
//! Every on-page representation of a certificate's verification state
//! (summary-card button, modal button) registers here as a [`RenderTarget`]
//! behind one contract, so the card and the modal are two registered
//! targets rather than separately maintained code paths. `render` is
//! idempotent: repeated calls with the same arguments produce the same end
//! state.

use crate::storage::status_store::StatusStore;
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock};

/// Visual state of a verify control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonState {
    pub label: String,
    pub disabled: bool,
}

impl ButtonState {
    pub fn new(label: &str) -> Self {
        ButtonState {
            label: label.to_string(),
            disabled: false,
        }
    }
}

/// One on-page control reflecting a certificate's verification state.
pub trait RenderTarget: Send + Sync {
    /// Whether this target currently represents the given certificate.
    fn matches(&self, key: &str) -> bool;

    /// Drives the control to the verified or unverified visual state.
    fn apply(&self, verified: bool);
}

/// Summary-card verify button. The state handle is shared so other layers
/// (the API surface, tests) can observe what the card shows.
pub struct CardButton {
    key: String,
    state: Arc<Mutex<ButtonState>>,
}

impl CardButton {
    pub fn new(key: &str) -> Self {
        CardButton {
            key: key.to_string(),
            state: Arc::new(Mutex::new(ButtonState::new("Verify"))),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current visual state.
    pub fn snapshot(&self) -> ButtonState {
        self.state.lock().expect("button lock poisoned").clone()
    }
}

impl RenderTarget for CardButton {
    fn matches(&self, key: &str) -> bool {
        self.key == key
    }

    fn apply(&self, verified: bool) {
        let mut state = self.state.lock().expect("button lock poisoned");
        *state = if verified {
            ButtonState {
                label: "Verified".to_string(),
                disabled: true,
            }
        } else {
            ButtonState::new("Verify")
        };
    }
}

/// Registry fanning `render` out to every matching target.
pub struct UiReflection {
    targets: RwLock<Vec<Arc<dyn RenderTarget>>>,
}

impl UiReflection {
    pub fn new() -> Self {
        UiReflection {
            targets: RwLock::new(Vec::new()),
        }
    }

    /// Registers a render target; targets live for the whole session.
    pub fn register(&self, target: Arc<dyn RenderTarget>) {
        let mut targets = self.targets.write().expect("targets lock poisoned");
        targets.push(target);
    }

    /// Updates every on-page control representing the certificate.
    pub fn render(&self, key: &str, verified: bool) {
        let targets = self.targets.read().expect("targets lock poisoned");
        for target in targets.iter().filter(|t| t.matches(key)) {
            target.apply(verified);
        }
    }

    /// Renders every verified certificate, run once at page-load time.
    pub fn render_verified(&self, statuses: &StatusStore) {
        for key in statuses.verified_keys() {
            self.render(&key, true);
        }
    }
}

impl Default for UiReflection {
    fn default() -> Self {
        Self::new()
    }
}
