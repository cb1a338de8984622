use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::ledger::AggregationMode;

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `SERVER_HOST`, default `127.0.0.1`
    pub host: String,

    /// `SERVER_PORT`, default `3000`
    pub port: u16,

    /// `QUICKBILL_DATA_DIR`, default `$XDG_DATA_HOME/quickbill`
    pub data_dir: PathBuf,

    /// `QUICKBILL_CLIENT_AGGREGATION`, default `incremental`
    pub aggregation: AggregationMode,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `SERVER_PORT` is not a valid port or
    /// `QUICKBILL_CLIENT_AGGREGATION` names an unknown mode.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match var("SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid SERVER_PORT `{raw}`"))?,
            None => 3000,
        };

        let data_dir = match var("QUICKBILL_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(var("XDG_DATA_HOME"), var("HOME").or_else(|| var("USERPROFILE"))),
        };

        let aggregation = match var("QUICKBILL_CLIENT_AGGREGATION") {
            Some(raw) => raw
                .parse::<AggregationMode>()
                .map_err(|e| anyhow::anyhow!(e))?,
            None => AggregationMode::default(),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            aggregation,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_data_dir(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    match (xdg_data_home, home) {
        (Some(base), _) => Path::new(&base).join("quickbill"),
        (None, Some(home)) => Path::new(&home).join(".local").join("share").join("quickbill"),
        (None, None) => PathBuf::from("quickbill-data"),
    }
}
