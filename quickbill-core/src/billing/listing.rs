use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::is_overdue;
use super::totals::compute_totals;
use crate::models::{Invoice, InvoiceStatus};

/// Status filter of the invoice list.
///
/// `Draft`, `Sent` and `Paid` match the stored status, so an overdue sent
/// invoice appears under both `Sent` and `Overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceFilter {
    #[default]
    All,
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice, now: DateTime<Utc>) -> bool {
        match self {
            InvoiceFilter::All => true,
            InvoiceFilter::Draft => invoice.status == InvoiceStatus::Draft,
            InvoiceFilter::Sent => invoice.status == InvoiceStatus::Sent,
            InvoiceFilter::Paid => invoice.status == InvoiceStatus::Paid,
            InvoiceFilter::Overdue => is_overdue(invoice, now),
        }
    }
}

/// Sort order of the invoice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceSort {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

/// Filters and sorts invoices for display. Ties keep their stored order.
pub fn list_invoices(
    invoices: &[Invoice],
    filter: InvoiceFilter,
    sort: InvoiceSort,
    now: DateTime<Utc>,
) -> Vec<Invoice> {
    let mut listed: Vec<Invoice> = invoices
        .iter()
        .filter(|invoice| filter.matches(invoice, now))
        .cloned()
        .collect();

    let total = |invoice: &Invoice| compute_totals(&invoice.line_items, invoice.tax_percentage).total;

    match sort {
        InvoiceSort::DateDesc => listed.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        InvoiceSort::DateAsc => listed.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        InvoiceSort::AmountDesc => listed.sort_by_key(|invoice| std::cmp::Reverse(total(invoice))),
        InvoiceSort::AmountAsc => listed.sort_by_key(|invoice| total(invoice)),
    }

    listed
}
