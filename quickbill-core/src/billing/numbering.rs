use chrono::{DateTime, Datelike, Utc};

use crate::models::Invoice;

/// Derives the next invoice number, `INV-{year}-{sequence}`.
///
/// The sequence is the current invoice count plus one, zero-padded to four
/// digits. It is not a monotonic counter: deleting an invoice and creating a
/// new one can hand out a number that was already used.
pub fn next_invoice_number(existing: &[Invoice], now: DateTime<Utc>) -> String {
    format!("INV-{}-{:04}", now.year(), existing.len() + 1)
}
