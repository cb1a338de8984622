use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stored invoice status.
///
/// `overdue` is never stored; it is derived from the due date by
/// [`crate::billing::status::resolve_display_status`]. Older data may still
/// carry a literal `"overdue"`, which is read back as `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    #[serde(alias = "overdue")]
    Sent,
    Paid,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "draft"),
            InvoiceStatus::Sent => write!(f, "sent"),
            InvoiceStatus::Paid => write!(f, "paid"),
        }
    }
}

/// One billable row of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
}

impl LineItem {
    /// Creates a line item with a fresh id.
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity,
            rate,
        }
    }

    /// The blank row a new invoice starts with: quantity 1, rate 0.
    pub fn blank() -> Self {
        Self::new("", Decimal::ONE, Decimal::ZERO)
    }
}

/// Invoice model as persisted under the `invoices` key.
///
/// Invoices are always stored whole; a save replaces the previous record
/// with the same `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier, immutable after creation
    pub id: Uuid,

    /// Human-readable number, e.g. `INV-2024-0001`
    pub invoice_number: String,

    /// Client name
    pub client_name: String,

    /// Client email address (identity key of the derived client record)
    pub client_email: String,

    /// Client postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,

    /// Line items in display order
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Tax rate in percent, applied to the subtotal
    pub tax_percentage: Decimal,

    /// Due date for payment
    pub due_date: NaiveDate,

    /// Free-form notes printed on the invoice
    #[serde(default)]
    pub notes: String,

    /// Stored status
    pub status: InvoiceStatus,

    /// Timestamp when the invoice was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the invoice was marked as paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,

    /// Timestamp when the invoice was marked as sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}
