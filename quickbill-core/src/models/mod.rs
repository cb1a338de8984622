pub mod client;
pub mod invoice;
pub mod settings;

pub use client::{Client, ClientDirectory};
pub use invoice::{Invoice, InvoiceStatus, LineItem};
pub use settings::Settings;
