// src/main.rs

//! # Certificate Verification System - Main Entry Point
//!
//! This binary wires together the certificate verification subsystem of the
//! portfolio site and exposes it through an API server.
//!
//! ## Architecture Overview
//! 1. **Catalog Layer**: static registry of certificate descriptors
//! 2. **Storage Layer**: durable verification statuses and the single-slot
//!    pending-verification marker
//! 3. **Services Layer**: the verification flow controller and API endpoints
//! 4. **UI Layer**: reflection registry keeping every on-page control in
//!    sync with persisted state
//!
//! ## Environment Variables
//! - `CERT_VERIFY_ADDR`: (Optional) API bind address (default: 127.0.0.1:3000)
//! - `CERT_VERIFY_STORAGE_DIR`: (Optional) durable storage directory
//!   (default: .cert-verify)
//! - `CERT_VERIFY_POLL_INTERVAL_SECS`: (Optional) return-watcher probe
//!   interval (default: 2)
//! - `CERT_VERIFY_POLL_TIMEOUT_SECS`: (Optional) return-watcher cutoff
//!   (default: 300)

use crate::browser::launcher::{SystemBrowser, VerificationBrowser};
use crate::catalog::service::CatalogService;
use crate::config::AppConfig;
use crate::services::api_server::ApiServer;
use crate::services::flow_controller::FlowController;
use crate::services::notifier::{LogNotifier, Notifier};
use crate::storage::pending_tracker::PendingTracker;
use crate::storage::status_store::StatusStore;
use crate::storage::store::{FileStore, KeyValueStore};
use crate::ui::modal::{ModalSession, ModalVerifyButton};
use crate::ui::reflection::{CardButton, UiReflection};
use dotenv::dotenv;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod browser; // external browsing-context integration
mod catalog; // static certificate registry
mod config; // environment configuration
mod error; // error types
mod models; // data structures
mod services; // business logic and API
mod storage; // durable storage layer
mod ui; // reflection layer and modal session
mod utils; // helper functions

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Open durable storage and the certificate catalog
/// 3. Register one card control per certificate plus the modal control
/// 4. Restore persisted state and finish any interrupted flow
/// 5. Start the API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::load();

    // Durable storage shared by the status store and the pending tracker
    let backing: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage_dir)?);

    // Initialize core components
    let catalog = Arc::new(CatalogService::with_builtin());
    let statuses = Arc::new(StatusStore::open(backing.clone())?);
    let pending = Arc::new(PendingTracker::open(backing)?);

    // UI reflection: the modal button and one card button per certificate
    // are just registered render targets behind one contract
    let ui = Arc::new(UiReflection::new());
    let modal = Arc::new(ModalSession::new());
    ui.register(Arc::new(ModalVerifyButton::new(modal.clone())));

    let mut cards = Vec::new();
    for descriptor in catalog.descriptors() {
        let card = Arc::new(CardButton::new(&descriptor.key));
        ui.register(card.clone());
        cards.push(card);
    }

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let browser: Arc<dyn VerificationBrowser> = Arc::new(SystemBrowser);

    // Verification Flow Controller
    let flow = Arc::new(FlowController::new(
        catalog.clone(),
        statuses.clone(),
        pending,
        ui,
        notifier,
        browser,
        config.poll_interval,
        config.poll_timeout,
    ));

    // Page-load path: render persisted statuses and optimistically resolve
    // any pending record left by an interrupted flow
    flow.restore()?;

    // Initialize API Server with all dependencies
    let api_server = ApiServer::new(catalog, statuses, flow, modal, cards);

    println!("API server running at http://{}", config.bind_addr);
    println!("Available endpoints:");
    println!("- GET  /certificates");
    println!("- GET  /certificates/:key");
    println!("- POST /certificates/:key/view");
    println!("- POST /close-modal");
    println!("- POST /verify/:key");
    println!("- POST /resolve");
    println!("- GET  /status/:key");

    api_server.run(config.bind_addr).await;
    Ok(())
}
