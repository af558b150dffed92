//! Storage backend integration
//!
//! Key-value and blob stores are external services addressed by string key.
//! Reads of a missing key return `Ok(None)`; transport failures are `Err`.

pub mod memory;
pub mod mime;
pub mod s3;
pub mod workers_kv;

pub use memory::{MemoryBlob, MemoryKv};
pub use s3::S3BlobClient;
pub use workers_kv::WorkersKvClient;

use crate::stream::ByteStream;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

#[async_trait]
pub trait BlobBackend: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;
    /// The returned stream can be requested again for the same key.
    async fn get(&self, key: &str) -> Result<Option<ByteStream>>;
}
