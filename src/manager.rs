//! Trading card orchestration
//!
//! Composes identity minting, artwork generation and persistence into the
//! public card operations.

use crate::generator::CardGenerator;
use crate::identity::CardId;
use crate::models::{Card, CardMetadata, RecordKind};
use crate::store::CardStore;
use crate::stream::{self, ByteStream};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct CardManager {
    generator: CardGenerator,
    store: Arc<dyn CardStore>,
}

impl CardManager {
    pub fn new(generator: CardGenerator, store: Arc<dyn CardStore>) -> Self {
        Self { generator, store }
    }

    /// Generate artwork without storing anything.
    pub async fn generate_card_image(&self, title: &str, description: &str) -> Result<ByteStream> {
        self.generator.generate(title, description).await
    }

    /// Generate artwork for a new card, persist both records and return the card's id.
    ///
    /// The metadata and image writes run concurrently and independently. If
    /// exactly one of them fails the result is [`Error::PartialWrite`] and the
    /// record that did land is left in place.
    pub async fn generate_and_save_card(&self, title: &str, description: &str) -> Result<CardId> {
        let id = CardId::generate();
        info!("[{}] Generating card '{}'", id, title);

        let artwork = self.generator.generate(title, description).await?;

        // The model gives no length up front; backends need a sized body.
        let image = stream::drain(artwork).await?;
        info!("[{}] Generated image ({} bytes)", id, image.len());

        let metadata = CardMetadata::new(title, description);
        let (metadata_written, image_written) = tokio::join!(
            self.store.put_metadata(&id, &metadata),
            self.store.put_image(&id, image)
        );

        match (metadata_written, image_written) {
            (Ok(()), Ok(())) => {
                info!("[{}] Card saved", id);
                Ok(id)
            }
            (Ok(()), Err(e)) => {
                warn!("[{}] Metadata stored but image write failed: {}", id, e);
                Err(Error::PartialWrite {
                    id: id.into_string(),
                    written: RecordKind::Metadata,
                    source: Box::new(e),
                })
            }
            (Err(e), Ok(())) => {
                warn!("[{}] Image stored but metadata write failed: {}", id, e);
                Err(Error::PartialWrite {
                    id: id.into_string(),
                    written: RecordKind::Image,
                    source: Box::new(e),
                })
            }
            (Err(metadata_err), Err(image_err)) => {
                error!(
                    "[{}] Both writes failed: {} / {}",
                    id, metadata_err, image_err
                );
                Err(metadata_err)
            }
        }
    }

    /// Look up a card's metadata. The image itself is not read.
    pub async fn get_card(&self, id: &CardId) -> Result<Option<Card>> {
        let Some(metadata) = self.store.get_metadata(id).await? else {
            info!("[{}] Card not found", id);
            return Ok(None);
        };

        Ok(Some(Card::new(
            id.to_string(),
            metadata,
            self.store.image_url(id),
        )))
    }

    pub async fn get_card_image(&self, id: &CardId) -> Result<Option<ByteStream>> {
        let image = self.store.get_image(id).await?;
        if image.is_none() {
            info!("[{}] Card image not found", id);
        }
        Ok(image)
    }
}
