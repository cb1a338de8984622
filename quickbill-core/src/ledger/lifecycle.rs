use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::clients::{apply_invoice_to_clients, AggregationMode};
use crate::error::StoreError;
use crate::models::{Invoice, InvoiceStatus};
use crate::store::{KeyValueStore, Repository};

/// Creates or replaces an invoice, then updates its client.
///
/// An invoice with a known `id` is replaced in place (keeping its position);
/// otherwise it is appended. No business validation is done here.
///
/// # Errors
///
/// Returns an error if the invoice or client collection cannot be written.
pub fn save_invoice<S: KeyValueStore>(
    repo: &Repository<S>,
    invoice: &Invoice,
    mode: AggregationMode,
) -> Result<(), StoreError> {
    let mut invoices = repo.invoices();

    match invoices.iter_mut().find(|existing| existing.id == invoice.id) {
        Some(existing) => {
            *existing = invoice.clone();
            info!("Updated invoice {} ({})", invoice.invoice_number, invoice.id);
        }
        None => {
            invoices.push(invoice.clone());
            info!("Created invoice {} ({})", invoice.invoice_number, invoice.id);
        }
    }

    repo.put_invoices(&invoices)?;
    apply_invoice_to_clients(repo, invoice, mode)?;
    Ok(())
}

/// Removes an invoice. Client aggregates are left untouched.
///
/// # Returns
///
/// Returns `Ok(false)` without writing anything if no invoice has `id`.
pub fn delete_invoice<S: KeyValueStore>(repo: &Repository<S>, id: Uuid) -> Result<bool, StoreError> {
    let mut invoices = repo.invoices();
    let before = invoices.len();
    invoices.retain(|invoice| invoice.id != id);

    if invoices.len() == before {
        debug!("Delete of unknown invoice {} ignored", id);
        return Ok(false);
    }

    repo.put_invoices(&invoices)?;
    info!("Deleted invoice {}", id);
    Ok(true)
}

/// Sets `status = sent` and stamps `sent_at`.
///
/// Repeating the call rewrites the same state with a fresh timestamp.
pub fn mark_invoice_as_sent<S: KeyValueStore>(
    repo: &Repository<S>,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, StoreError> {
    update_invoice(repo, id, |invoice| {
        invoice.status = InvoiceStatus::Sent;
        invoice.sent_at = Some(now);
    })
}

/// Sets `status = paid` and stamps `paid_at`.
pub fn mark_invoice_as_paid<S: KeyValueStore>(
    repo: &Repository<S>,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, StoreError> {
    update_invoice(repo, id, |invoice| {
        invoice.status = InvoiceStatus::Paid;
        invoice.paid_at = Some(now);
    })
}

fn update_invoice<S: KeyValueStore>(
    repo: &Repository<S>,
    id: Uuid,
    mutate: impl FnOnce(&mut Invoice),
) -> Result<bool, StoreError> {
    let mut invoices = repo.invoices();
    let Some(invoice) = invoices.iter_mut().find(|invoice| invoice.id == id) else {
        debug!("Status change of unknown invoice {} ignored", id);
        return Ok(false);
    };

    mutate(invoice);
    info!("Invoice {} is now {}", invoice.invoice_number, invoice.status);

    repo.put_invoices(&invoices)?;
    Ok(true)
}
