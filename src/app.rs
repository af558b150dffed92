//! Service wiring: builds a [`CardManager`] from configuration.

use crate::ai::{MockTextToImageClient, TextToImageService, WorkersAiClient};
use crate::backend::{BlobBackend, KvBackend, MemoryBlob, MemoryKv, S3BlobClient, WorkersKvClient};
use crate::config::{Config, StorageTopology};
use crate::generator::CardGenerator;
use crate::manager::CardManager;
use crate::store::{CardStore, SplitCardStore, UnifiedCardStore};
use crate::Result;
use std::sync::Arc;
use tracing::info;

pub struct App {
    manager: CardManager,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub ai: Arc<dyn TextToImageService>,
    pub model: String,
    pub store: Arc<dyn CardStore>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            manager: CardManager::new(
                CardGenerator::new(services.ai, services.model),
                services.store,
            ),
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub async fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Self::from_config(&config).await
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let ai: Arc<dyn TextToImageService> = match &config.live {
            Some(live) => {
                info!("Image provider: Workers AI (model: {})", config.ai_model);
                Arc::new(
                    WorkersAiClient::new(
                        live.account_id.clone(),
                        live.api_token.clone(),
                        config.ai_timeout,
                    )?
                    .with_base_url(config.ai_base_url.clone()),
                )
            }
            None => {
                info!("DRY_RUN enabled, using placeholder artwork and in-memory storage");
                Arc::new(MockTextToImageClient::new())
            }
        };

        let kv: Arc<dyn KvBackend> = match &config.live {
            Some(live) => Arc::new(WorkersKvClient::new(
                live.account_id.clone(),
                live.kv_namespace_id.clone(),
                live.api_token.clone(),
            )),
            None => Arc::new(MemoryKv::new()),
        };

        let store: Arc<dyn CardStore> = match config.topology {
            StorageTopology::Unified => {
                info!("Storage topology: unified key-value namespace");
                Arc::new(UnifiedCardStore::new(kv))
            }
            StorageTopology::Split => {
                info!("Storage topology: key-value metadata, blob images");
                let blob: Arc<dyn BlobBackend> =
                    match config.live.as_ref().and_then(|live| live.blob.as_ref()) {
                        Some(blob) => Arc::new(
                            S3BlobClient::new(
                                blob.access_key_id.clone(),
                                blob.secret_access_key.clone(),
                                blob.endpoint.clone(),
                                blob.region.clone(),
                                blob.bucket.clone(),
                            )
                            .await?,
                        ),
                        None => Arc::new(MemoryBlob::new()),
                    };
                Arc::new(
                    SplitCardStore::new(kv, blob)
                        .with_image_base_url(config.image_base_url.clone()),
                )
            }
        };

        Ok(Self::with_services(AppServices {
            ai,
            model: config.ai_model.clone(),
            store,
        }))
    }

    pub fn manager(&self) -> &CardManager {
        &self.manager
    }
}
