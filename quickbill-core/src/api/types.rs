use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::billing::format::{format_currency, format_date};
use crate::billing::{
    compute_totals, resolve_display_status, DashboardStats, DisplayStatus, InvoiceFilter,
    InvoiceSort, Totals,
};
use crate::models::{Invoice, LineItem};

/// Query string of `GET /api/invoices`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub status: InvoiceFilter,
    pub sort: InvoiceSort,
}

/// Invoice as returned to the presentation layer: the stored record plus
/// its derived display status and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub display_status: DisplayStatus,
    pub totals: Totals,
    /// Total formatted in the business's default currency
    pub formatted_total: String,
    pub formatted_due_date: String,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, now: DateTime<Utc>, currency: &str) -> Self {
        let display_status = resolve_display_status(&invoice, now);
        let totals = compute_totals(&invoice.line_items, invoice.tax_percentage);
        let formatted_due_date = format_date(invoice.due_date);
        InvoiceResponse {
            invoice,
            display_status,
            totals,
            formatted_total: format_currency(totals.total, currency),
            formatted_due_date,
        }
    }
}

/// Body of `POST /api/totals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRequest {
    pub line_items: Vec<LineAmount>,
    #[serde(default)]
    pub tax_percentage: Decimal,
}

/// Quantity and rate of a line that may not have been saved yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineAmount {
    pub quantity: Decimal,
    pub rate: Decimal,
}

impl From<LineAmount> for LineItem {
    fn from(line: LineAmount) -> Self {
        LineItem::new("", line.quantity, line.rate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceNumberResponse {
    pub invoice_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_invoices: Vec<InvoiceResponse>,
}

/// Body of a `422` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub errors: Vec<String>,
}
