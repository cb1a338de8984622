use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::types::{
    DashboardResponse, InvoiceNumberResponse, InvoiceResponse, ListQuery, TotalsRequest,
};
use super::validation::validate_invoice;
use super::{AppState, SharedLedger};
use crate::billing::{compute_totals, Totals};
use crate::models::{Client, ClientDirectory, Invoice, LineItem, Settings};

/// Health check endpoint.
///
/// Returns a simple JSON response indicating the server is running.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quickbill-core",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/invoices` — filtered and sorted invoice list.
pub async fn list_invoices_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<InvoiceResponse>>, ApiError> {
    let ledger = state.ledger();
    let now = ledger.now();
    let currency = ledger.settings().default_currency;
    let invoices = ledger
        .list_invoices(query.status, query.sort)
        .into_iter()
        .map(|invoice| InvoiceResponse::new(invoice, now, &currency))
        .collect();
    Ok(Json(invoices))
}

/// `GET /api/invoices/new` — unsaved draft prefilled from settings.
pub async fn new_invoice_handler(
    State(state): State<AppState>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let ledger = state.ledger();
    Ok(Json(respond(&ledger, ledger.new_invoice())))
}

/// `GET /api/invoices/:id`
pub async fn get_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let ledger = state.ledger();
    let invoice = ledger.invoice(id).ok_or(ApiError::InvoiceNotFound(id))?;
    Ok(Json(respond(&ledger, invoice)))
}

/// `POST /api/invoices` — validates and saves an invoice.
///
/// `201` for a new id; a body whose id is already stored updates that
/// invoice and answers `200`.
pub async fn create_invoice_handler(
    State(state): State<AppState>,
    Json(invoice): Json<Invoice>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    validate_invoice(&invoice)?;

    let ledger = state.ledger();
    let status = match ledger.invoice(invoice.id) {
        Some(_) => StatusCode::OK,
        None => StatusCode::CREATED,
    };
    ledger.save_invoice(&invoice)?;
    info!("Saved invoice {} via API", invoice.invoice_number);

    Ok((status, Json(respond(&ledger, invoice))))
}

/// `PUT /api/invoices/:id` — validates and saves an invoice under `id`.
pub async fn update_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(invoice): Json<Invoice>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    if invoice.id != id {
        return Err(ApiError::IdMismatch {
            path: id,
            body: invoice.id,
        });
    }
    validate_invoice(&invoice)?;

    let ledger = state.ledger();
    ledger.save_invoice(&invoice)?;
    info!("Saved invoice {} via API", invoice.invoice_number);

    Ok(Json(respond(&ledger, invoice)))
}

/// `DELETE /api/invoices/:id` — always `204`, deleting an unknown id is a no-op.
pub async fn delete_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.ledger().delete_invoice(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/invoices/:id/sent`
pub async fn mark_sent_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let ledger = state.ledger();
    if !ledger.mark_invoice_as_sent(id)? {
        return Err(ApiError::InvoiceNotFound(id));
    }
    let invoice = ledger.invoice(id).ok_or(ApiError::InvoiceNotFound(id))?;
    Ok(Json(respond(&ledger, invoice)))
}

/// `POST /api/invoices/:id/paid`
pub async fn mark_paid_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let ledger = state.ledger();
    if !ledger.mark_invoice_as_paid(id)? {
        return Err(ApiError::InvoiceNotFound(id));
    }
    let invoice = ledger.invoice(id).ok_or(ApiError::InvoiceNotFound(id))?;
    Ok(Json(respond(&ledger, invoice)))
}

/// `GET /api/invoice-number`
pub async fn invoice_number_handler(
    State(state): State<AppState>,
) -> Result<Json<InvoiceNumberResponse>, ApiError> {
    let invoice_number = state.ledger().generate_invoice_number();
    Ok(Json(InvoiceNumberResponse { invoice_number }))
}

/// `POST /api/totals` — totals of unsaved line items.
pub async fn totals_handler(Json(request): Json<TotalsRequest>) -> Json<Totals> {
    let items: Vec<LineItem> = request.line_items.into_iter().map(LineItem::from).collect();
    Json(compute_totals(&items, request.tax_percentage))
}

/// `GET /api/clients`
pub async fn list_clients_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.ledger().clients()))
}

/// `GET /api/clients/summary`
pub async fn client_summary_handler(
    State(state): State<AppState>,
) -> Result<Json<ClientDirectory>, ApiError> {
    Ok(Json(state.ledger().client_directory()))
}

/// `GET /api/settings`
pub async fn get_settings_handler(
    State(state): State<AppState>,
) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.ledger().settings()))
}

/// `PUT /api/settings` — fields missing from the body take their defaults.
pub async fn save_settings_handler(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, ApiError> {
    let ledger = state.ledger();
    ledger.save_settings(&settings)?;
    info!("Saved settings for {}", settings.business_name);
    Ok(Json(ledger.settings()))
}

/// `GET /api/dashboard`
pub async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let ledger = state.ledger();
    let now = ledger.now();
    let currency = ledger.settings().default_currency;
    let dashboard = ledger.dashboard();

    Ok(Json(DashboardResponse {
        stats: dashboard.stats,
        recent_invoices: dashboard
            .recent_invoices
            .into_iter()
            .map(|invoice| InvoiceResponse::new(invoice, now, &currency))
            .collect(),
    }))
}

fn respond(ledger: &SharedLedger, invoice: Invoice) -> InvoiceResponse {
    InvoiceResponse::new(invoice, ledger.now(), &ledger.settings().default_currency)
}
