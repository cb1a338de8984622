use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Collection, KeyValueStore};
use crate::error::StoreError;
use crate::models::{Client, Invoice, Settings};

/// Typed access to the persisted collections.
///
/// Reads are failure-tolerant: an absent, unreadable or malformed
/// collection reads as empty (settings read as defaults) and is logged.
/// Writes replace the whole collection.
#[derive(Debug, Clone)]
pub struct Repository<S> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads a whole collection.
    ///
    /// # Returns
    ///
    /// Returns the stored records in stored order, or an empty vector if the
    /// key is absent or its content cannot be read or parsed.
    pub fn get_all<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let key = collection.key();
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read `{}`, treating as empty: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Malformed `{}` collection, treating as empty: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Overwrites a whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be serialized or the store
    /// rejects the write.
    pub fn put_all<T: Serialize>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), StoreError> {
        let key = collection.key();
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)?;
        debug!("Stored {} record(s) under `{}`", records.len(), key);
        Ok(())
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.get_all(Collection::Invoices)
    }

    pub fn put_invoices(&self, invoices: &[Invoice]) -> Result<(), StoreError> {
        self.put_all(Collection::Invoices, invoices)
    }

    pub fn find_invoice(&self, id: Uuid) -> Option<Invoice> {
        self.invoices().into_iter().find(|invoice| invoice.id == id)
    }

    pub fn clients(&self) -> Vec<Client> {
        self.get_all(Collection::Clients)
    }

    pub fn put_clients(&self, clients: &[Client]) -> Result<(), StoreError> {
        self.put_all(Collection::Clients, clients)
    }

    /// Reads settings, overlaying each stored field on the defaults.
    ///
    /// A stored field whose value does not fit its type is skipped and the
    /// default is kept for it; the remaining fields still apply.
    pub fn get_settings(&self) -> Settings {
        let key = Collection::Settings.key();
        match self.store.get(key) {
            Ok(Some(raw)) => merge_settings(&raw),
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("Failed to read `{}`, using defaults: {}", key, e);
                Settings::default()
            }
        }
    }

    pub fn put_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let key = Collection::Settings.key();
        let raw = serde_json::to_string(settings).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }
}

fn merge_settings(raw: &str) -> Settings {
    let stored = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) | Err(_) => {
            warn!("Malformed `settings` record, using defaults");
            return Settings::default();
        }
    };

    let mut merged = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    };

    for (field, value) in stored {
        let previous = merged.insert(field.clone(), value);
        if serde_json::from_value::<Settings>(Value::Object(merged.clone())).is_err() {
            warn!("Ignoring invalid settings field `{}`", field);
            match previous {
                Some(previous) => merged.insert(field, previous),
                None => merged.remove(&field),
            };
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}
