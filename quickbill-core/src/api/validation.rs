use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Invoice;

/// An invoice rejected at the HTTP boundary, with one message per problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid invoice: {}", .0.join("; "))]
pub struct ValidationError(pub Vec<String>);

/// Checks an invoice before it is handed to the ledger.
///
/// The ledger itself stores whatever it is given; these are the rules the
/// invoice editor enforces before saving:
/// - client name and email are required
/// - every line item needs a description and a rate above zero
pub fn validate_invoice(invoice: &Invoice) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if invoice.client_name.trim().is_empty() {
        errors.push("client name is required".to_string());
    }
    if invoice.client_email.trim().is_empty() {
        errors.push("client email is required".to_string());
    }

    for (index, item) in invoice.line_items.iter().enumerate() {
        if item.description.trim().is_empty() {
            errors.push(format!("line item {}: description is required", index + 1));
        }
        if item.rate <= Decimal::ZERO {
            errors.push(format!("line item {}: rate must be greater than zero", index + 1));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}
