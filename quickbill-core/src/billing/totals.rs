use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LineItem;

/// Subtotal, tax and total of a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Computes invoice totals.
///
/// `subtotal` is the sum of `quantity × rate` over the items, `tax` is
/// `subtotal × tax_percentage / 100` and `total` is their sum. Nothing is
/// rounded here; display rounding belongs to [`super::format`]. Negative
/// quantities or rates are carried through as-is, and arithmetic saturates
/// at the decimal range rather than panicking.
///
/// # Example
///
/// ```rust
/// use quickbill_core::billing::compute_totals;
/// use quickbill_core::models::LineItem;
/// use rust_decimal::Decimal;
///
/// let items = vec![LineItem::new("Design", Decimal::from(2), Decimal::from(50))];
/// let totals = compute_totals(&items, Decimal::from(10));
/// assert_eq!(totals.total, Decimal::from(110));
/// ```
pub fn compute_totals(line_items: &[LineItem], tax_percentage: Decimal) -> Totals {
    let subtotal = line_items.iter().fold(Decimal::ZERO, |sum, item| {
        sum.saturating_add(item.quantity.saturating_mul(item.rate))
    });
    let tax = subtotal.saturating_mul(tax_percentage / Decimal::ONE_HUNDRED);
    let total = subtotal.saturating_add(tax);

    Totals { subtotal, tax, total }
}
