use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Invoice, InvoiceStatus};

/// Status shown to the user.
///
/// Mirrors [`InvoiceStatus`] plus the derived `Overdue` state:
/// - Draft: not yet sent
/// - Sent: sent and not yet due
/// - Paid: paid (terminal, never overdue)
/// - Overdue: unpaid and the due date has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayStatus::Draft => write!(f, "draft"),
            DisplayStatus::Sent => write!(f, "sent"),
            DisplayStatus::Paid => write!(f, "paid"),
            DisplayStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl From<InvoiceStatus> for DisplayStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => DisplayStatus::Draft,
            InvoiceStatus::Sent => DisplayStatus::Sent,
            InvoiceStatus::Paid => DisplayStatus::Paid,
        }
    }
}

/// Derives the display status of an invoice at `now`.
///
/// The due date counts as the end of that day in UTC: an invoice becomes
/// overdue on the first day strictly after its due date.
///
/// # Arguments
///
/// * `invoice` - The invoice to inspect
/// * `now` - Current time, injected by the caller
pub fn resolve_display_status(invoice: &Invoice, now: DateTime<Utc>) -> DisplayStatus {
    match invoice.status {
        InvoiceStatus::Paid => DisplayStatus::Paid,
        _ if invoice.due_date < now.date_naive() => DisplayStatus::Overdue,
        status => status.into(),
    }
}

/// Whether the invoice is unpaid past its due date.
pub fn is_overdue(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    resolve_display_status(invoice, now) == DisplayStatus::Overdue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn invoice(status: InvoiceStatus, due_date: NaiveDate) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            invoice_number: "INV-2024-0001".to_string(),
            client_name: "Acme".to_string(),
            client_email: "billing@acme.test".to_string(),
            client_address: None,
            line_items: vec![LineItem::blank()],
            tax_percentage: Decimal::ZERO,
            due_date,
            notes: String::new(),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            paid_at: None,
            sent_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_paid_is_never_overdue() {
        let due = now().date_naive() - Duration::days(400);
        let inv = invoice(InvoiceStatus::Paid, due);
        assert_eq!(resolve_display_status(&inv, now()), DisplayStatus::Paid);
        assert!(!is_overdue(&inv, now()));
    }

    #[test]
    fn test_sent_due_yesterday_is_overdue() {
        let inv = invoice(InvoiceStatus::Sent, now().date_naive() - Duration::days(1));
        assert_eq!(resolve_display_status(&inv, now()), DisplayStatus::Overdue);
        assert!(is_overdue(&inv, now()));
    }

    #[test]
    fn test_sent_due_tomorrow_is_sent() {
        let inv = invoice(InvoiceStatus::Sent, now().date_naive() + Duration::days(1));
        assert_eq!(resolve_display_status(&inv, now()), DisplayStatus::Sent);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let late_evening = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap();
        let inv = invoice(InvoiceStatus::Sent, late_evening.date_naive());
        assert_eq!(resolve_display_status(&inv, late_evening), DisplayStatus::Sent);
    }

    #[test]
    fn test_past_due_draft_is_overdue() {
        let inv = invoice(InvoiceStatus::Draft, now().date_naive() - Duration::days(3));
        assert_eq!(resolve_display_status(&inv, now()), DisplayStatus::Overdue);

        let inv = invoice(InvoiceStatus::Draft, now().date_naive());
        assert_eq!(resolve_display_status(&inv, now()), DisplayStatus::Draft);
    }
}
