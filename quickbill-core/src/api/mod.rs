pub mod error;
pub mod handlers;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use validation::{validate_invoice, ValidationError};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clock::Clock;
use crate::ledger::Ledger;
use crate::store::KeyValueStore;
use handlers::*;

/// Ledger over type-erased store and clock, as held by the server.
pub type SharedLedger = Ledger<Arc<dyn KeyValueStore>, Arc<dyn Clock>>;

/// Application state shared with route handlers.
///
/// The ledger sits behind a mutex so each request's read-modify-write runs
/// to completion before the next one starts. Handlers never hold the lock
/// across an `.await`. Every store write replaces a whole collection, so a
/// handler that panicked left no partial state and a poisoned lock is
/// recovered.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Mutex<SharedLedger>>,
}

impl AppState {
    pub fn new(ledger: SharedLedger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn ledger(&self) -> MutexGuard<'_, SharedLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Creates the application router.
///
/// # Arguments
///
/// * `state` - The application state holding the ledger
///
/// # Returns
///
/// Returns a configured Axum Router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/invoices",
            get(list_invoices_handler).post(create_invoice_handler),
        )
        .route("/api/invoices/new", get(new_invoice_handler))
        .route(
            "/api/invoices/:id",
            get(get_invoice_handler)
                .put(update_invoice_handler)
                .delete(delete_invoice_handler),
        )
        .route("/api/invoices/:id/sent", post(mark_sent_handler))
        .route("/api/invoices/:id/paid", post(mark_paid_handler))
        .route("/api/invoice-number", get(invoice_number_handler))
        .route("/api/totals", post(totals_handler))
        .route("/api/clients", get(list_clients_handler))
        .route("/api/clients/summary", get(client_summary_handler))
        .route(
            "/api/settings",
            get(get_settings_handler).put(save_settings_handler),
        )
        .route("/api/dashboard", get(dashboard_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
