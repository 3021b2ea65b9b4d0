// src/services/api_server.rs
//! API Server for the certificate verification system.
//!
//! Exposes the verification subsystem over HTTP so a front-end can drive
//! it. The API is built using Axum and includes endpoints for:
//! - Listing the certificate catalog with live verification state
//! - Viewing a certificate (opens the detail modal)
//! - Starting a verification flow against the external issuer
//! - Resolving a return from the issuer explicitly
//! - Querying a certificate's persisted verification status

use crate::catalog::service::CatalogService;
use crate::error::VerifyError;
use crate::models::certificate::CertificateDescriptor;
use crate::models::status::VerificationStatus;
use crate::services::flow_controller::{BeginOutcome, FlowController};
use crate::storage::status_store::StatusStore;
use crate::ui::modal::{ModalSession, ModalView};
use crate::ui::reflection::{ButtonState, CardButton};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

// API response structures

/// One row of the certificate listing
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CertificateSummary {
    key: String,
    title: String,
    issuer: String,
    verified: bool,
    supports_verification: bool,
    card_button: ButtonState,
}

/// Response for the certificate detail endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CertificateDetailResponse {
    certificate: CertificateDescriptor,
    verified: bool,
    status: Option<VerificationStatus>,
}

/// Response for starting a verification flow
#[derive(Serialize)]
struct VerifyResponse {
    outcome: &'static str,
}

/// Response for the explicit resolve endpoint
#[derive(Serialize)]
struct ResolveResponse {
    resolved: Option<String>,
}

/// Response for the status endpoint
#[derive(Serialize)]
struct StatusResponse {
    key: String,
    verified: bool,
}

/// Error body shared by all endpoints
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// API server state containing all service dependencies
#[derive(Clone)]
pub struct ApiServer {
    /// Static certificate catalog
    catalog: Arc<CatalogService>,

    /// Persistent verification status store (read side)
    statuses: Arc<StatusStore>,

    /// The verify-request state machine
    flow: Arc<FlowController>,

    /// Transient modal session (current selection)
    modal: Arc<ModalSession>,

    /// Per-certificate card controls, for listing their visual state
    cards: Vec<Arc<CardButton>>,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `catalog` - Static certificate catalog
    /// * `statuses` - Persistent status store
    /// * `flow` - Verification flow controller
    /// * `modal` - Modal session owning the current selection
    /// * `cards` - Card controls registered with the reflection layer
    pub fn new(
        catalog: Arc<CatalogService>,
        statuses: Arc<StatusStore>,
        flow: Arc<FlowController>,
        modal: Arc<ModalSession>,
        cards: Vec<Arc<CardButton>>,
    ) -> Self {
        ApiServer {
            catalog,
            statuses,
            flow,
            modal,
            cards,
        }
    }

    /// Builds the application router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/certificates", get(Self::list_certificates_handler))
            .route("/certificates/:key", get(Self::certificate_detail_handler))
            .route("/certificates/:key/view", post(Self::view_certificate_handler))
            .route("/close-modal", post(Self::close_modal_handler))
            .route("/verify/:key", post(Self::verify_handler))
            .route("/resolve", post(Self::resolve_handler))
            .route("/status/:key", get(Self::status_handler))
            .with_state(Arc::new(self.clone()))
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, app).await.unwrap();
    }

    /// Lists every certificate with its live verification state
    ///
    /// # Endpoint
    /// GET /certificates
    async fn list_certificates_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        let mut summaries: Vec<CertificateSummary> = state
            .cards
            .iter()
            .filter_map(|card| {
                state.catalog.lookup(card.key()).map(|descriptor| CertificateSummary {
                    key: descriptor.key.clone(),
                    title: descriptor.title.clone(),
                    issuer: descriptor.issuer.clone(),
                    verified: state.statuses.is_verified(&descriptor.key),
                    supports_verification: descriptor.supports_verification(),
                    card_button: card.snapshot(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.key.cmp(&b.key));

        Json(summaries)
    }

    /// Returns the full descriptor and status of one certificate
    ///
    /// # Endpoint
    /// GET /certificates/:key
    ///
    /// # Responses
    /// - 200 OK: Returns descriptor plus verification status
    /// - 404 Not Found: No certificate carries this key
    async fn certificate_detail_handler(
        Path(key): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.catalog.lookup(&key) {
            Some(descriptor) => (
                StatusCode::OK,
                Json(CertificateDetailResponse {
                    certificate: descriptor.clone(),
                    verified: state.statuses.is_verified(&key),
                    status: state.statuses.get(&key),
                }),
            )
                .into_response(),
            None => not_found(&key),
        }
    }

    /// Opens the certificate modal, setting the current selection
    ///
    /// # Endpoint
    /// POST /certificates/:key/view
    ///
    /// # Responses
    /// - 200 OK: Returns the modal view content
    /// - 404 Not Found: No certificate carries this key
    async fn view_certificate_handler(
        Path(key): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.catalog.lookup(&key) {
            Some(descriptor) => {
                let verified = state.statuses.is_verified(&key);
                let view: ModalView = state.modal.open(descriptor, verified);
                (StatusCode::OK, Json(view)).into_response()
            }
            None => not_found(&key),
        }
    }

    /// Closes the certificate modal, clearing the current selection
    ///
    /// # Endpoint
    /// POST /close-modal
    async fn close_modal_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        state.modal.close();
        StatusCode::OK
    }

    /// Starts a verification flow for a certificate
    ///
    /// # Endpoint
    /// POST /verify/:key
    ///
    /// # Responses
    /// - 200 OK: Flow started, or the certificate was already verified
    /// - 404 Not Found: No certificate carries this key
    /// - 422 Unprocessable Entity: The certificate has no verification URL
    /// - 503 Service Unavailable: The external context could not be opened
    /// - 500 Internal Server Error: Storage failure
    async fn verify_handler(
        Path(key): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        match state.flow.begin(&key) {
            Ok(outcome) => {
                let status = match outcome {
                    BeginOutcome::Started | BeginOutcome::AlreadyVerified => StatusCode::OK,
                    BeginOutcome::NotFound => StatusCode::NOT_FOUND,
                    BeginOutcome::Unavailable => StatusCode::UNPROCESSABLE_ENTITY,
                    BeginOutcome::PopupBlocked => StatusCode::SERVICE_UNAVAILABLE,
                };
                (
                    status,
                    Json(VerifyResponse {
                        outcome: outcome_name(outcome),
                    }),
                )
                    .into_response()
            }
            Err(e) => internal_error(e),
        }
    }

    /// Explicitly resolves a pending verification return
    ///
    /// # Endpoint
    /// POST /resolve
    ///
    /// # Responses
    /// - 200 OK: Returns the resolved certificate key, null when idle
    /// - 500 Internal Server Error: Storage failure
    async fn resolve_handler(State(state): State<Arc<ApiServer>>) -> impl IntoResponse {
        match state.flow.resolve() {
            Ok(resolved) => (StatusCode::OK, Json(ResolveResponse { resolved })).into_response(),
            Err(e) => internal_error(e),
        }
    }

    /// Queries a certificate's persisted verification status
    ///
    /// # Endpoint
    /// GET /status/:key
    async fn status_handler(
        Path(key): Path<String>,
        State(state): State<Arc<ApiServer>>,
    ) -> impl IntoResponse {
        Json(StatusResponse {
            verified: state.statuses.is_verified(&key),
            key,
        })
    }
}

fn outcome_name(outcome: BeginOutcome) -> &'static str {
    match outcome {
        BeginOutcome::Started => "started",
        BeginOutcome::AlreadyVerified => "alreadyVerified",
        BeginOutcome::NotFound => "notFound",
        BeginOutcome::Unavailable => "unavailable",
        BeginOutcome::PopupBlocked => "popupBlocked",
    }
}

fn not_found(key: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("no certificate with key '{}'", key),
        }),
    )
        .into_response()
}

fn internal_error(e: VerifyError) -> axum::response::Response {
    log::error!("verification request failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}
