//! Invoicing core for a single freelancer: invoices, derived client
//! aggregates, dashboard rollups, and a flat key-value persistence layer.

pub mod api;
pub mod billing;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use ledger::Ledger;
