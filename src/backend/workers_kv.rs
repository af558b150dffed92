use super::KvBackend;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com";

/// Workers KV namespace accessed through the Cloudflare REST API.
pub struct WorkersKvClient {
    client: Client,
    account_id: String,
    namespace_id: String,
    api_token: String,
    base_url: String,
}

impl WorkersKvClient {
    pub fn new(account_id: String, namespace_id: String, api_token: String) -> Self {
        Self::new_with_client(account_id, namespace_id, api_token, Client::new())
    }

    pub fn new_with_client(
        account_id: String,
        namespace_id: String,
        api_token: String,
        client: Client,
    ) -> Self {
        Self {
            client,
            account_id,
            namespace_id,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// The key becomes a single percent-encoded path segment, slashes included.
    fn value_url(&self, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid KV base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid KV base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "client",
                "v4",
                "accounts",
                self.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.namespace_id.as_str(),
                "values",
                key,
            ]);
        Ok(url)
    }
}

#[async_trait]
impl KvBackend for WorkersKvClient {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        tracing::debug!("Writing {} bytes to KV key {}", value.len(), key);

        let response = self
            .client
            .put(self.value_url(key)?)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/octet-stream")
            .body(value)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("KV write request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("KV write error (status {}): {}", status, error_text);
            return Err(Error::Backend(format!(
                "KV write error (status {}): {}",
                status, error_text
            )));
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(self.value_url(key)?)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("KV read request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("KV read error (status {}): {}", status, error_text);
            return Err(Error::Backend(format!(
                "KV read error (status {}): {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Backend(format!("Failed to read KV value: {}", e)))?;
        Ok(Some(bytes.to_vec()))
    }
}
