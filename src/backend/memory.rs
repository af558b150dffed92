use super::{BlobBackend, KvBackend};
use crate::stream::{self, ByteStream};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-process key-value store, used for dry runs and tests.
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    put_count: Arc<Mutex<usize>>,
    get_count: Arc<Mutex<usize>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.entries.lock().unwrap().insert(key.into(), value);
        self
    }

    pub fn with_write_failure(self, should_fail: bool) -> Self {
        *self.fail_writes.lock().unwrap() = should_fail;
        self
    }

    pub fn get_put_count(&self) -> usize {
        *self.put_count.lock().unwrap()
    }

    pub fn get_get_count(&self) -> usize {
        *self.get_count.lock().unwrap()
    }

    pub fn get_entries(&self) -> HashMap<String, Vec<u8>> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KvBackend for MemoryKv {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        *self.put_count.lock().unwrap() += 1;

        if *self.fail_writes.lock().unwrap() {
            return Err(Error::Backend(format!("Mock KV write failure: {}", key)));
        }

        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        *self.get_count.lock().unwrap() += 1;

        Ok(self.entries.lock().unwrap().get(key).cloned())
    }
}

/// A stored blob and the content type it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-process blob store, used for dry runs and tests.
#[derive(Clone, Default)]
pub struct MemoryBlob {
    objects: Arc<Mutex<HashMap<String, StoredBlob>>>,
    put_count: Arc<Mutex<usize>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryBlob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, key: impl Into<String>, data: Vec<u8>, content_type: &str) -> Self {
        self.objects.lock().unwrap().insert(
            key.into(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub fn with_write_failure(self, should_fail: bool) -> Self {
        *self.fail_writes.lock().unwrap() = should_fail;
        self
    }

    pub fn get_put_count(&self) -> usize {
        *self.put_count.lock().unwrap()
    }

    pub fn get_objects(&self) -> HashMap<String, StoredBlob> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobBackend for MemoryBlob {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        *self.put_count.lock().unwrap() += 1;

        if *self.fail_writes.lock().unwrap() {
            return Err(Error::Backend(format!("Mock blob write failure: {}", key)));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<ByteStream>> {
        let objects = self.objects.lock().unwrap();
        Ok(objects
            .get(key)
            .map(|blob| stream::from_bytes(blob.data.clone())))
    }
}
