//! Environment-driven configuration
//!
//! Values are read from the process environment after loading `.env`.
//! With `DRY_RUN=true` no credentials are required and every external
//! service is replaced by an in-memory stand-in.

use crate::ai::{workers, DEFAULT_MODEL};
use crate::store::split::DEFAULT_IMAGE_BASE_URL;
use crate::{Error, Result};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;
const DEFAULT_BLOB_REGION: &str = "auto";

/// Where card images live relative to their metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTopology {
    /// One key-value namespace, records separated by key prefix.
    Unified,
    /// Metadata in key-value storage, images in a blob store.
    Split,
}

impl FromStr for StorageTopology {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unified" => Ok(Self::Unified),
            "split" => Ok(Self::Split),
            other => Err(Error::Config(format!(
                "Invalid STORAGE_TOPOLOGY '{}'. Expected 'unified' or 'split'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlobConfig {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Credentials for the hosted services. Absent in dry-run mode.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub account_id: String,
    pub api_token: String,
    pub kv_namespace_id: String,
    /// Present exactly when the topology is [`StorageTopology::Split`].
    pub blob: Option<BlobConfig>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ai_model: String,
    pub ai_base_url: String,
    pub ai_timeout: Duration,
    pub topology: StorageTopology,
    pub image_base_url: String,
    pub live: Option<LiveConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required =
            |key: &str| var(key).ok_or_else(|| Error::Config(format!("{} not set", key)));

        let dry_run = var("DRY_RUN")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let topology = match var("STORAGE_TOPOLOGY") {
            Some(value) => value.parse()?,
            None => StorageTopology::Unified,
        };

        let ai_timeout = match var("AI_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(value.parse().map_err(|_| {
                Error::Config(format!("Invalid AI_TIMEOUT_SECS '{}'", value))
            })?),
            None => Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        };

        let live = if dry_run {
            None
        } else {
            let blob = match topology {
                StorageTopology::Unified => None,
                StorageTopology::Split => Some(BlobConfig {
                    bucket: required("BLOB_BUCKET")?,
                    endpoint: var("BLOB_ENDPOINT"),
                    region: var("BLOB_REGION").unwrap_or_else(|| DEFAULT_BLOB_REGION.to_string()),
                    access_key_id: required("BLOB_ACCESS_KEY_ID")?,
                    secret_access_key: required("BLOB_SECRET_ACCESS_KEY")?,
                }),
            };

            Some(LiveConfig {
                account_id: required("AI_ACCOUNT_ID")?,
                api_token: required("AI_API_TOKEN")?,
                kv_namespace_id: required("KV_NAMESPACE_ID")?,
                blob,
            })
        };

        Ok(Self {
            ai_model: var("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ai_base_url: var("AI_BASE_URL")
                .unwrap_or_else(|| workers::DEFAULT_BASE_URL.to_string()),
            ai_timeout,
            topology,
            image_base_url: var("IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            live,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.live.is_none()
    }
}
