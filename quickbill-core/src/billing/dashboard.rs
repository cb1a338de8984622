use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{resolve_display_status, DisplayStatus};
use super::totals::compute_totals;
use crate::models::Invoice;

/// Dashboard rollup over all invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Totals of sent and overdue invoices
    pub total_outstanding: Decimal,

    /// Totals of invoices paid in the current calendar month
    pub paid_this_month: Decimal,

    pub overdue_count: usize,
    pub total_invoices: usize,
}

/// Computes dashboard statistics from scratch.
///
/// Each invoice is classified by its display status at `now`:
/// - Paid: counted in `paid_this_month` if `paid_at` is in the same UTC
///   year and month as `now`
/// - Overdue: counted in `overdue_count` and `total_outstanding`
/// - Sent: counted in `total_outstanding`
/// - Draft: only counted in `total_invoices`
pub fn compute_dashboard_stats(invoices: &[Invoice], now: DateTime<Utc>) -> DashboardStats {
    let mut stats = DashboardStats {
        total_invoices: invoices.len(),
        ..DashboardStats::default()
    };

    for invoice in invoices {
        let total = compute_totals(&invoice.line_items, invoice.tax_percentage).total;

        match resolve_display_status(invoice, now) {
            DisplayStatus::Paid => {
                let this_month = invoice
                    .paid_at
                    .map(|paid_at| paid_at.year() == now.year() && paid_at.month() == now.month())
                    .unwrap_or(false);
                if this_month {
                    stats.paid_this_month = stats.paid_this_month.saturating_add(total);
                }
            }
            DisplayStatus::Overdue => {
                stats.overdue_count += 1;
                stats.total_outstanding = stats.total_outstanding.saturating_add(total);
            }
            DisplayStatus::Sent => {
                stats.total_outstanding = stats.total_outstanding.saturating_add(total);
            }
            DisplayStatus::Draft => {}
        }
    }

    stats
}

/// Returns up to `limit` invoices, newest `created_at` first.
pub fn recent_invoices(invoices: &[Invoice], limit: usize) -> Vec<Invoice> {
    let mut recent = invoices.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent
}
