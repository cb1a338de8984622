use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business settings singleton, persisted under the `settings` key.
///
/// Every field falls back to [`Settings::default`] when missing from the
/// stored record, so partially written settings still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub business_name: String,
    pub business_email: String,
    pub business_address: String,

    /// Encoded logo image (data URL), opaque to the core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// ISO 4217 code used for display
    pub default_currency: String,
    pub default_tax_percentage: Decimal,

    /// Payment terms in days, used for the due date of new invoices
    pub default_payment_terms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business_name: "My Business".to_string(),
            business_email: String::new(),
            business_address: String::new(),
            logo: None,
            default_currency: "USD".to_string(),
            default_tax_percentage: Decimal::ZERO,
            default_payment_terms: 14,
        }
    }
}
