pub mod file;
pub mod memory;
pub mod repository;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::Repository;

use std::sync::Arc;

use crate::error::StoreError;

/// Flat string key-value namespace.
///
/// Values are whole serialized collections; a `set` replaces the previous
/// value with no version check, so concurrent writers race last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// The three persisted collections and their fixed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Invoices,
    Clients,
    Settings,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Invoices => "invoices",
            Collection::Clients => "clients",
            Collection::Settings => "settings",
        }
    }
}
