use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::billing::compute_totals;
use crate::error::StoreError;
use crate::models::{Client, Invoice};
use crate::store::{KeyValueStore, Repository};

/// How client aggregates react to an invoice save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Add the saved invoice on top of the running totals. Saving the same
    /// invoice twice counts it twice.
    #[default]
    Incremental,

    /// Rebuild the client's totals from every stored invoice with its email.
    Recompute,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::Incremental => write!(f, "incremental"),
            AggregationMode::Recompute => write!(f, "recompute"),
        }
    }
}

impl FromStr for AggregationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incremental" => Ok(AggregationMode::Incremental),
            "recompute" => Ok(AggregationMode::Recompute),
            other => Err(format!("unknown client aggregation mode `{other}`")),
        }
    }
}

/// Finds or creates the client of `invoice` and updates its aggregates.
///
/// Called after every invoice save, never after a delete. The client is
/// matched by email, case-insensitively; the stored email keeps its original
/// casing.
///
/// # Returns
///
/// Returns the updated client record.
///
/// # Errors
///
/// Returns an error if the client collection cannot be written.
pub fn apply_invoice_to_clients<S: KeyValueStore>(
    repo: &Repository<S>,
    invoice: &Invoice,
    mode: AggregationMode,
) -> Result<Client, StoreError> {
    let mut clients = repo.clients();
    let total = compute_totals(&invoice.line_items, invoice.tax_percentage).total;

    let index = match clients
        .iter()
        .position(|client| client.matches_email(&invoice.client_email))
    {
        Some(index) => {
            let client = &mut clients[index];
            client.total_invoices = client.total_invoices.saturating_add(1);
            client.total_billed = client.total_billed.saturating_add(total);
            client.last_invoice_date = Some(invoice.created_at);
            if let Some(address) = invoice.client_address.as_deref().filter(|a| !a.is_empty()) {
                client.address = Some(address.to_string());
            }
            debug!(
                "Applied invoice {} to existing client {}",
                invoice.invoice_number, client.id
            );
            index
        }
        None => {
            let client = Client {
                id: Uuid::new_v4(),
                name: invoice.client_name.clone(),
                email: invoice.client_email.clone(),
                address: invoice.client_address.clone(),
                total_invoices: 1,
                total_billed: total,
                last_invoice_date: Some(invoice.created_at),
            };
            info!("Created client {} for {}", client.id, client.email);
            clients.push(client);
            clients.len() - 1
        }
    };

    if mode == AggregationMode::Recompute {
        recompute_totals(&mut clients[index], &repo.invoices());
    }

    repo.put_clients(&clients)?;
    Ok(clients[index].clone())
}

fn recompute_totals(client: &mut Client, invoices: &[Invoice]) {
    let mut count = 0u32;
    let mut billed = Decimal::ZERO;
    let mut last = None;

    for invoice in invoices.iter().filter(|i| client.matches_email(&i.client_email)) {
        count += 1;
        billed = billed.saturating_add(compute_totals(&invoice.line_items, invoice.tax_percentage).total);
        last = last.max(Some(invoice.created_at));
    }

    client.total_invoices = count;
    client.total_billed = billed;
    client.last_invoice_date = last;
}
