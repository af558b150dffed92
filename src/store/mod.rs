//! Card persistence
//!
//! A card is two records addressed by the same id: a JSON metadata record
//! and the raw image bytes. Where those records live depends on the
//! deployment topology; callers only see [`CardStore`].

pub mod split;
pub mod unified;

pub use split::SplitCardStore;
pub use unified::UnifiedCardStore;

use crate::identity::CardId;
use crate::models::{CardMetadata, RecordKind};
use crate::stream::ByteStream;
use crate::{Error, Result};
use async_trait::async_trait;

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn put_metadata(&self, id: &CardId, metadata: &CardMetadata) -> Result<()>;
    async fn put_image(&self, id: &CardId, image: Vec<u8>) -> Result<()>;
    async fn get_metadata(&self, id: &CardId) -> Result<Option<CardMetadata>>;
    async fn get_image(&self, id: &CardId) -> Result<Option<ByteStream>>;

    /// Where a client fetches the image for `id`. Never touches the backend.
    fn image_url(&self, id: &CardId) -> String;
}

pub(crate) fn encode_metadata(key: &str, metadata: &CardMetadata) -> Result<Vec<u8>> {
    serde_json::to_vec(metadata).map_err(|e| Error::store_write(RecordKind::Metadata, key, e))
}

pub(crate) fn decode_metadata(key: &str, raw: &[u8]) -> Result<CardMetadata> {
    serde_json::from_slice(raw).map_err(|e| {
        Error::store_read(
            RecordKind::Metadata,
            key,
            format!("invalid metadata JSON: {}", e),
        )
    })
}
