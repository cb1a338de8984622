pub mod clients;
pub mod lifecycle;

#[cfg(test)]
mod tests;

pub use clients::{apply_invoice_to_clients, AggregationMode};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::billing::{
    compute_dashboard_stats, is_overdue, list_invoices, next_invoice_number, recent_invoices,
    DashboardStats, InvoiceFilter, InvoiceSort,
};
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::models::{Client, ClientDirectory, Invoice, InvoiceStatus, LineItem, Settings};
use crate::store::{KeyValueStore, Repository};

/// Number of invoices shown on the dashboard.
pub const RECENT_INVOICE_LIMIT: usize = 5;

/// Dashboard statistics plus the most recent invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_invoices: Vec<Invoice>,
}

/// Core-facing API used by the presentation layer.
///
/// Owns the store and the clock. Every operation reads the collections it
/// needs from the store; nothing is cached between calls.
pub struct Ledger<S, C = SystemClock> {
    repo: Repository<S>,
    clock: C,
    aggregation: AggregationMode,
}

impl<S: KeyValueStore> Ledger<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Ledger<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            repo: Repository::new(store),
            clock,
            aggregation: AggregationMode::default(),
        }
    }

    pub fn with_aggregation(mut self, aggregation: AggregationMode) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.repo.invoices()
    }

    pub fn invoice(&self, id: Uuid) -> Option<Invoice> {
        self.repo.find_invoice(id)
    }

    pub fn save_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        lifecycle::save_invoice(&self.repo, invoice, self.aggregation)
    }

    pub fn delete_invoice(&self, id: Uuid) -> Result<bool, StoreError> {
        lifecycle::delete_invoice(&self.repo, id)
    }

    pub fn mark_invoice_as_sent(&self, id: Uuid) -> Result<bool, StoreError> {
        lifecycle::mark_invoice_as_sent(&self.repo, id, self.clock.now())
    }

    pub fn mark_invoice_as_paid(&self, id: Uuid) -> Result<bool, StoreError> {
        lifecycle::mark_invoice_as_paid(&self.repo, id, self.clock.now())
    }

    pub fn clients(&self) -> Vec<Client> {
        self.repo.clients()
    }

    pub fn client_directory(&self) -> ClientDirectory {
        ClientDirectory::from_clients(&self.repo.clients())
    }

    pub fn settings(&self) -> Settings {
        self.repo.get_settings()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.repo.put_settings(settings)
    }

    pub fn generate_invoice_number(&self) -> String {
        next_invoice_number(&self.repo.invoices(), self.clock.now())
    }

    pub fn is_overdue(&self, invoice: &Invoice) -> bool {
        is_overdue(invoice, self.clock.now())
    }

    /// Builds an unsaved draft prefilled from the settings.
    ///
    /// The due date is today plus the default payment terms, capped at the
    /// latest representable date; the tax rate is the default tax
    /// percentage. One blank line item is included.
    pub fn new_invoice(&self) -> Invoice {
        let settings = self.settings();
        let now = self.clock.now();

        Invoice {
            id: Uuid::new_v4(),
            invoice_number: self.generate_invoice_number(),
            client_name: String::new(),
            client_email: String::new(),
            client_address: None,
            line_items: vec![LineItem::blank()],
            tax_percentage: settings.default_tax_percentage,
            due_date: now
                .date_naive()
                .checked_add_days(Days::new(u64::from(settings.default_payment_terms)))
                .unwrap_or(NaiveDate::MAX),
            notes: String::new(),
            status: InvoiceStatus::Draft,
            created_at: now,
            paid_at: None,
            sent_at: None,
        }
    }

    pub fn list_invoices(&self, filter: InvoiceFilter, sort: InvoiceSort) -> Vec<Invoice> {
        list_invoices(&self.repo.invoices(), filter, sort, self.clock.now())
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        compute_dashboard_stats(&self.repo.invoices(), self.clock.now())
    }

    pub fn dashboard(&self) -> Dashboard {
        let invoices = self.repo.invoices();
        Dashboard {
            stats: compute_dashboard_stats(&invoices, self.clock.now()),
            recent_invoices: recent_invoices(&invoices, RECENT_INVOICE_LIMIT),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
