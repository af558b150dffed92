use super::{decode_metadata, encode_metadata, CardStore};
use crate::backend::KvBackend;
use crate::identity::CardId;
use crate::models::{CardMetadata, RecordKind};
use crate::stream::{self, ByteStream};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

const METADATA_PREFIX: &str = "/data/";
const IMAGE_PREFIX: &str = "/image/";

pub fn metadata_key(id: &CardId) -> String {
    format!("{}{}", METADATA_PREFIX, id)
}

pub fn image_key(id: &CardId) -> String {
    format!("{}{}", IMAGE_PREFIX, id)
}

/// Both records in one key-value namespace, split by key prefix.
pub struct UnifiedCardStore {
    kv: Arc<dyn KvBackend>,
}

impl UnifiedCardStore {
    pub fn new(kv: Arc<dyn KvBackend>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl CardStore for UnifiedCardStore {
    async fn put_metadata(&self, id: &CardId, metadata: &CardMetadata) -> Result<()> {
        let key = metadata_key(id);
        let value = encode_metadata(&key, metadata)?;

        self.kv
            .put(&key, value)
            .await
            .map_err(|e| Error::store_write(RecordKind::Metadata, &key, e))
    }

    async fn put_image(&self, id: &CardId, image: Vec<u8>) -> Result<()> {
        let key = image_key(id);

        self.kv
            .put(&key, image)
            .await
            .map_err(|e| Error::store_write(RecordKind::Image, &key, e))
    }

    async fn get_metadata(&self, id: &CardId) -> Result<Option<CardMetadata>> {
        let key = metadata_key(id);

        let raw = self
            .kv
            .get(&key)
            .await
            .map_err(|e| Error::store_read(RecordKind::Metadata, &key, e))?;

        raw.map(|raw| decode_metadata(&key, &raw)).transpose()
    }

    async fn get_image(&self, id: &CardId) -> Result<Option<ByteStream>> {
        let key = image_key(id);

        let raw = self
            .kv
            .get(&key)
            .await
            .map_err(|e| Error::store_read(RecordKind::Image, &key, e))?;

        Ok(raw.map(stream::from_bytes))
    }

    fn image_url(&self, id: &CardId) -> String {
        image_key(id)
    }
}
