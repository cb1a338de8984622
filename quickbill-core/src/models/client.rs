use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client model as persisted under the `clients` key.
///
/// Clients are never created directly. They are derived from invoice saves
/// and identified by their email address, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique identifier for the client
    pub id: Uuid,

    /// Client name as given on the first invoice
    pub name: String,

    /// Email address (identity key, case-insensitive)
    pub email: String,

    /// Last non-empty address seen on an invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Number of invoice saves applied to this client
    pub total_invoices: u32,

    /// Sum of invoice totals applied to this client
    pub total_billed: Decimal,

    /// Creation timestamp of the most recently applied invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_invoice_date: Option<DateTime<Utc>>,
}

impl Client {
    /// Whether this client is the one identified by `email`.
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}

/// Directory-level rollup shown above the client list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDirectory {
    pub client_count: usize,
    pub total_billed: Decimal,
    /// Mean invoices per client, rounded half-up
    pub average_invoices_per_client: u32,
}

impl ClientDirectory {
    pub fn from_clients(clients: &[Client]) -> Self {
        let client_count = clients.len();
        let total_billed = clients
            .iter()
            .fold(Decimal::ZERO, |sum, c| sum.saturating_add(c.total_billed));
        let invoice_sum: u64 = clients.iter().map(|c| u64::from(c.total_invoices)).sum();

        let average_invoices_per_client = if client_count == 0 {
            0
        } else {
            let n = client_count as u64;
            ((2 * invoice_sum + n) / (2 * n)) as u32
        };

        Self {
            client_count,
            total_billed,
            average_invoices_per_client,
        }
    }
}
