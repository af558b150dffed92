use super::{decode_metadata, encode_metadata, CardStore};
use crate::backend::mime::detect_image_mime;
use crate::backend::{BlobBackend, KvBackend};
use crate::identity::CardId;
use crate::models::{CardMetadata, RecordKind};
use crate::stream::ByteStream;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_IMAGE_BASE_URL: &str = "/image";

/// Metadata in a key-value store, image bytes in a blob store, both keyed by the bare id.
pub struct SplitCardStore {
    kv: Arc<dyn KvBackend>,
    blob: Arc<dyn BlobBackend>,
    image_base_url: String,
}

impl SplitCardStore {
    pub fn new(kv: Arc<dyn KvBackend>, blob: Arc<dyn BlobBackend>) -> Self {
        Self {
            kv,
            blob,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_image_base_url(mut self, base_url: String) -> Self {
        self.image_base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CardStore for SplitCardStore {
    async fn put_metadata(&self, id: &CardId, metadata: &CardMetadata) -> Result<()> {
        let value = encode_metadata(id.as_str(), metadata)?;

        self.kv
            .put(id.as_str(), value)
            .await
            .map_err(|e| Error::store_write(RecordKind::Metadata, id.as_str(), e))
    }

    async fn put_image(&self, id: &CardId, image: Vec<u8>) -> Result<()> {
        let content_type = detect_image_mime(&image);

        self.blob
            .put(id.as_str(), image, content_type)
            .await
            .map_err(|e| Error::store_write(RecordKind::Image, id.as_str(), e))
    }

    async fn get_metadata(&self, id: &CardId) -> Result<Option<CardMetadata>> {
        let raw = self
            .kv
            .get(id.as_str())
            .await
            .map_err(|e| Error::store_read(RecordKind::Metadata, id.as_str(), e))?;

        raw.map(|raw| decode_metadata(id.as_str(), &raw))
            .transpose()
    }

    async fn get_image(&self, id: &CardId) -> Result<Option<ByteStream>> {
        self.blob
            .get(id.as_str())
            .await
            .map_err(|e| Error::store_read(RecordKind::Image, id.as_str(), e))
    }

    fn image_url(&self, id: &CardId) -> String {
        format!("{}/{}", self.image_base_url, id)
    }
}
