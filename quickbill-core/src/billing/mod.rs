pub mod dashboard;
pub mod format;
pub mod listing;
pub mod numbering;
pub mod status;
pub mod totals;

pub use dashboard::{compute_dashboard_stats, recent_invoices, DashboardStats};
pub use listing::{list_invoices, InvoiceFilter, InvoiceSort};
pub use numbering::next_invoice_number;
pub use status::{is_overdue, resolve_display_status, DisplayStatus};
pub use totals::{compute_totals, Totals};
