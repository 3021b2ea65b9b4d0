// src/services/flow_controller.rs
//! Verification flow controller.
//!
//! The state machine owning the verify-request lifecycle:
//!
//! ```text
//! Idle --begin--> AwaitingReturn --resolve--> Idle
//! ```
//!
//! `Idle` means no pending record exists; `AwaitingReturn` means the user
//! was sent to the external issuer page and a durable pending record marks
//! the departure. Return is detected two ways: explicitly, by a cancellable
//! polling task watching the external context's closed state, or
//! implicitly, when a fresh startup finds a surviving pending record and
//! optimistically treats it as a return. The implicit path cannot tell a
//! completed verification from an abandoned one; the presence of the
//! pending record alone is treated as sufficient, by design.

use crate::browser::launcher::{VerificationBrowser, WindowHandle};
use crate::catalog::service::CatalogService;
use crate::error::VerifyError;
use crate::models::status::PendingVerification;
use crate::services::notifier::{NoticeLevel, Notifier};
use crate::storage::pending_tracker::PendingTracker;
use crate::storage::status_store::StatusStore;
use crate::ui::reflection::UiReflection;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// What `begin` did for a verify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    /// External page opened, pending record committed, watcher running.
    Started,
    /// Certificate was already verified; UI re-rendered, nothing stored.
    AlreadyVerified,
    /// No catalog entry carries this key.
    NotFound,
    /// The certificate has no verification URL.
    Unavailable,
    /// The external context could not be opened; nothing was committed.
    PopupBlocked,
}

/// Orchestrates opening the external link, detecting the user's return,
/// and transitioning verification status.
///
/// The controller is the only writer of the status store and the pending
/// tracker; the UI layer is a pure reader.
pub struct FlowController {
    catalog: Arc<CatalogService>,
    statuses: Arc<StatusStore>,
    pending: Arc<PendingTracker>,
    ui: Arc<UiReflection>,
    notifier: Arc<dyn Notifier>,
    browser: Arc<dyn VerificationBrowser>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl FlowController {
    /// Constructs the controller from its collaborators.
    ///
    /// # Arguments
    /// * `poll_interval` - how often the return watcher probes the external
    ///   context (the site used 2 seconds)
    /// * `poll_timeout` - how long the watcher runs before giving up and
    ///   leaving the pending record for the next startup (the site used
    ///   5 minutes)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<CatalogService>,
        statuses: Arc<StatusStore>,
        pending: Arc<PendingTracker>,
        ui: Arc<UiReflection>,
        notifier: Arc<dyn Notifier>,
        browser: Arc<dyn VerificationBrowser>,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Self {
        FlowController {
            catalog,
            statuses,
            pending,
            ui,
            notifier,
            browser,
            poll_interval,
            poll_timeout,
        }
    }

    /// Starts a verification flow for the certificate with the given key.
    ///
    /// The pending record is committed only after the external context has
    /// actually opened, so a blocked pop-up can never leave a false
    /// awaiting-return state to mislead the next startup.
    ///
    /// # Errors
    /// Returns `VerifyError` only for storage failures; every user-level
    /// condition (unknown key, missing URL, already verified, blocked
    /// pop-up) degrades to a notification and a [`BeginOutcome`].
    pub fn begin(self: &Arc<Self>, key: &str) -> Result<BeginOutcome, VerifyError> {
        let descriptor = match self.catalog.lookup(key) {
            Some(d) => d,
            None => {
                self.notifier
                    .notify("Certificate data not found!", NoticeLevel::Error);
                return Ok(BeginOutcome::NotFound);
            }
        };

        if self.statuses.is_verified(key) {
            self.notifier.notify(
                &format!("{} is already verified!", descriptor.title),
                NoticeLevel::Success,
            );
            self.ui.render(key, true);
            return Ok(BeginOutcome::AlreadyVerified);
        }

        let url = match &descriptor.verification_url {
            Some(url) => url,
            None => {
                self.notifier.notify(
                    "Verification link not available for this certificate.",
                    NoticeLevel::Error,
                );
                return Ok(BeginOutcome::Unavailable);
            }
        };

        let window = match self.browser.open(url) {
            Some(window) => window,
            None => {
                self.notifier
                    .notify("Please allow pop-ups for verification.", NoticeLevel::Warning);
                return Ok(BeginOutcome::PopupBlocked);
            }
        };

        self.pending.begin(PendingVerification {
            certificate_key: descriptor.key.clone(),
            certificate_name: descriptor.title.clone(),
            issuer: descriptor.issuer.clone(),
            timestamp: Utc::now(),
        })?;

        self.notifier.notify(
            &format!("Redirecting to {} for verification...", descriptor.issuer),
            NoticeLevel::Info,
        );

        self.spawn_return_watcher(window);
        Ok(BeginOutcome::Started)
    }

    /// Commits the pending verification, if one exists.
    ///
    /// Marks the certificate verified with the key, name, issuer and
    /// timestamp carried in the pending record, refreshes every UI surface
    /// for that certificate, clears the slot, and emits one success
    /// notification. A pending record whose catalog entry has vanished is
    /// still honored by the store; the render simply finds no live targets.
    ///
    /// # Returns
    /// The resolved certificate key, or `None` when nothing was pending.
    pub fn resolve(&self) -> Result<Option<String>, VerifyError> {
        let record = match self.pending.peek() {
            Some(record) => record,
            None => return Ok(None),
        };

        self.statuses.mark_verified(
            &record.certificate_key,
            &record.certificate_name,
            &record.issuer,
            record.timestamp,
        )?;
        self.ui.render(&record.certificate_key, true);
        self.pending.clear()?;

        self.notifier.notify(
            &format!(
                "{} verification completed! Certificate authenticity confirmed by {}.",
                record.certificate_name, record.issuer
            ),
            NoticeLevel::Success,
        );

        Ok(Some(record.certificate_key))
    }

    /// Startup path: renders every persisted verified status and finishes
    /// any interrupted flow.
    ///
    /// A surviving pending record is optimistically treated as a completed
    /// return. This is the documented reload heuristic, not a bug: the
    /// subsystem cannot distinguish "verified and came back" from
    /// "abandoned and came back another day".
    pub fn restore(&self) -> Result<(), VerifyError> {
        self.ui.render_verified(&self.statuses);
        self.resolve()?;
        Ok(())
    }

    /// Polls the external context until it closes, then resolves. Stops
    /// after `poll_timeout`, leaving the pending record in place so the
    /// next startup still resolves it.
    fn spawn_return_watcher(self: &Arc<Self>, window: Box<dyn WindowHandle>) {
        let controller = Arc::clone(self);
        let poll_interval = self.poll_interval;
        let poll_timeout = self.poll_timeout;

        tokio::spawn(async move {
            let deadline = tokio::time::sleep(poll_timeout);
            tokio::pin!(deadline);
            let mut ticker = tokio::time::interval(poll_interval);
            // the first tick completes immediately, skip it
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if window.is_closed() {
                            if let Err(e) = controller.resolve() {
                                log::error!("failed to resolve verification return: {}", e);
                            }
                            break;
                        }
                    }
                    _ = &mut deadline => {
                        log::debug!(
                            "return watcher timed out; pending record left for next startup"
                        );
                        break;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::launcher::fakes::FakeBrowser;
    use crate::catalog::service::CatalogService;
    use crate::models::certificate::CertificateDescriptor;
    use crate::services::notifier::recording::RecordingNotifier;
    use crate::storage::store::{KeyValueStore, MemoryStore};
    use crate::ui::modal::{ModalSession, ModalVerifyButton};
    use crate::ui::reflection::CardButton;

    struct Harness {
        controller: Arc<FlowController>,
        notifier: Arc<RecordingNotifier>,
        browser: Arc<FakeBrowser>,
        statuses: Arc<StatusStore>,
        pending: Arc<PendingTracker>,
        cards: Vec<Arc<CardButton>>,
        modal: Arc<ModalSession>,
    }

    fn harness(backing: Arc<dyn KeyValueStore>, browser: FakeBrowser) -> Harness {
        let catalog = Arc::new(test_catalog());
        let statuses = Arc::new(StatusStore::open(backing.clone()).unwrap());
        let pending = Arc::new(PendingTracker::open(backing).unwrap());
        let ui = Arc::new(UiReflection::new());
        let modal = Arc::new(ModalSession::new());
        ui.register(Arc::new(ModalVerifyButton::new(modal.clone())));

        let mut cards = Vec::new();
        for descriptor in catalog.descriptors() {
            let card = Arc::new(CardButton::new(&descriptor.key));
            ui.register(card.clone());
            cards.push(card);
        }

        let notifier = Arc::new(RecordingNotifier::new());
        let browser = Arc::new(browser);
        let controller = Arc::new(FlowController::new(
            catalog,
            statuses.clone(),
            pending.clone(),
            ui,
            notifier.clone(),
            browser.clone(),
            Duration::from_millis(5),
            Duration::from_millis(500),
        ));

        Harness {
            controller,
            notifier,
            browser,
            statuses,
            pending,
            cards,
            modal,
        }
    }

    fn test_catalog() -> CatalogService {
        let builtin = CatalogService::with_builtin();
        let mut descriptors: Vec<CertificateDescriptor> =
            builtin.descriptors().cloned().collect();
        descriptors.push(CertificateDescriptor {
            key: "offline".to_string(),
            title: "Offline Workshop Certificate".to_string(),
            course: "Workshop".to_string(),
            issuer: "Local Meetup".to_string(),
            date: "May 1, 2024".to_string(),
            duration: "8 Hours".to_string(),
            description: "Attended in person.".to_string(),
            skills: vec![],
            certificate_id: "WS20240501".to_string(),
            achievement: "Participation".to_string(),
            seal: String::new(),
            verification_url: None,
        });
        CatalogService::from_descriptors(descriptors)
    }

    fn card<'a>(h: &'a Harness, key: &str) -> &'a Arc<CardButton> {
        h.cards.iter().find(|c| c.key() == key).unwrap()
    }

    #[tokio::test]
    async fn test_begin_opens_link_and_commits_pending() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());

        let outcome = h.controller.begin("fullstack").unwrap();
        assert_eq!(outcome, BeginOutcome::Started);
        assert_eq!(
            h.browser.opened_urls(),
            vec!["https://www.udemy.com/certificate/your-certificate-id-here/".to_string()]
        );

        let pending = h.pending.peek().unwrap();
        assert_eq!(pending.certificate_key, "fullstack");
        assert_eq!(pending.issuer, "Udemy");
        assert!(!h.statuses.is_verified("fullstack"));

        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].0.contains("Redirecting to Udemy"));
        assert_eq!(notices[0].1, NoticeLevel::Info);
    }

    #[test]
    fn test_begin_without_verification_url_never_creates_pending() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());

        let outcome = h.controller.begin("offline").unwrap();
        assert_eq!(outcome, BeginOutcome::Unavailable);
        assert!(h.pending.peek().is_none());
        assert!(h.browser.opened_urls().is_empty());

        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].0.contains("not available"));
        assert_eq!(notices[0].1, NoticeLevel::Error);
    }

    #[test]
    fn test_begin_unknown_key_is_noop_with_notice() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());

        let outcome = h.controller.begin("blockchain").unwrap();
        assert_eq!(outcome, BeginOutcome::NotFound);
        assert!(h.pending.peek().is_none());
        assert_eq!(h.notifier.notices()[0].0, "Certificate data not found!");
    }

    #[test]
    fn test_blocked_popup_commits_nothing() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::blocking());

        let outcome = h.controller.begin("react").unwrap();
        assert_eq!(outcome, BeginOutcome::PopupBlocked);
        assert!(h.pending.peek().is_none());
        assert!(!h.statuses.is_verified("react"));

        let notices = h.notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, "Please allow pop-ups for verification.");
        assert_eq!(notices[0].1, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_reload_with_pending_record_resolves() {
        let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let h = harness(backing.clone(), FakeBrowser::new());
            h.controller.begin("fullstack").unwrap();
        }

        // Fresh page load over the same durable storage
        let h = harness(backing, FakeBrowser::new());
        h.controller.restore().unwrap();

        assert!(h.statuses.is_verified("fullstack"));
        assert!(h.pending.peek().is_none());
        assert_eq!(card(&h, "fullstack").snapshot().label, "Verified");
        assert!(card(&h, "fullstack").snapshot().disabled);

        // Exactly one notification fires on the reload path
        assert_eq!(h.notifier.count(), 1);
        let (message, level) = h.notifier.notices().remove(0);
        assert!(message.contains("Full Stack Web Development Certificate"));
        assert!(message.contains("confirmed by Udemy"));
        assert_eq!(level, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_second_begin_wins_the_pending_slot() {
        let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let h = harness(backing.clone(), FakeBrowser::new());
            h.controller.begin("fullstack").unwrap();
            h.controller.begin("react").unwrap();
            assert_eq!(h.pending.peek().unwrap().certificate_key, "react");
        }

        let h = harness(backing, FakeBrowser::new());
        h.controller.restore().unwrap();

        assert!(h.statuses.is_verified("react"));
        assert!(!h.statuses.is_verified("fullstack"));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());
        h.controller.begin("javascript").unwrap();

        let first = h.controller.resolve().unwrap();
        assert_eq!(first.as_deref(), Some("javascript"));
        let snapshot = h.statuses.get("javascript").unwrap();

        let second = h.controller.resolve().unwrap();
        assert!(second.is_none());
        assert_eq!(h.statuses.get("javascript").unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_begin_on_verified_certificate_keeps_stored_timestamp() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());
        h.controller.begin("uiux").unwrap();
        h.controller.resolve().unwrap();
        let stored = h.statuses.get("uiux").unwrap();

        let outcome = h.controller.begin("uiux").unwrap();
        assert_eq!(outcome, BeginOutcome::AlreadyVerified);
        assert_eq!(h.statuses.get("uiux").unwrap(), stored);
        assert!(h.pending.peek().is_none());
        // only the first begin opened the external page
        assert_eq!(h.browser.opened_urls().len(), 1);
    }

    #[tokio::test]
    async fn test_closing_the_window_resolves_explicitly() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());
        h.controller.begin("fullstack").unwrap();
        assert!(!h.statuses.is_verified("fullstack"));

        h.browser.close_window();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(h.statuses.is_verified("fullstack"));
        assert!(h.pending.peek().is_none());
        assert_eq!(card(&h, "fullstack").snapshot().label, "Verified");
    }

    #[tokio::test]
    async fn test_resolve_updates_card_and_open_modal_together() {
        let h = harness(Arc::new(MemoryStore::new()), FakeBrowser::new());
        let catalog = test_catalog();
        h.modal.open(catalog.lookup("react").unwrap(), false);

        h.controller.begin("react").unwrap();
        h.controller.resolve().unwrap();

        assert_eq!(card(&h, "react").snapshot().label, "Verified");
        let modal_button = h.modal.current().unwrap().verify_button;
        assert_eq!(modal_button.label, "Verified");
        assert!(modal_button.disabled);
    }

    #[tokio::test]
    async fn test_restore_renders_persisted_statuses() {
        let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let h = harness(backing.clone(), FakeBrowser::new());
            h.controller.begin("fullstack").unwrap();
            h.controller.resolve().unwrap();
        }

        let h = harness(backing, FakeBrowser::new());
        assert_eq!(card(&h, "fullstack").snapshot().label, "Verify");

        h.controller.restore().unwrap();
        assert_eq!(card(&h, "fullstack").snapshot().label, "Verified");
        // nothing was pending, so no notification fired
        assert_eq!(h.notifier.count(), 0);
    }
}
