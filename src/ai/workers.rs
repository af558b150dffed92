use super::{TextToImageInput, TextToImageService};
use crate::stream::ByteStream;
use crate::{Error, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com";

/// Workers AI REST client. The image body is handed back as a stream.
pub struct WorkersAiClient {
    client: Client,
    account_id: String,
    api_token: String,
    base_url: String,
}

impl WorkersAiClient {
    pub fn new(account_id: String, api_token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new_with_client(account_id, api_token, client))
    }

    pub fn new_with_client(account_id: String, api_token: String, client: Client) -> Self {
        Self {
            client,
            account_id,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn run_url(&self, model: &str) -> String {
        format!(
            "{}/client/v4/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, model
        )
    }
}

#[async_trait]
impl TextToImageService for WorkersAiClient {
    async fn run(&self, model: &str, input: &TextToImageInput) -> Result<ByteStream> {
        tracing::debug!("Sending text-to-image request to Workers AI (model: {})", model);

        let response = self
            .client
            .post(self.run_url(model))
            .bearer_auth(&self.api_token)
            .json(input)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Workers AI: {}", e);
                Error::Generation(format!("Workers AI request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Workers AI error (status {}): {}", status, error_text);
            return Err(Error::Generation(format!(
                "Workers AI error (status {}): {}",
                status, error_text
            )));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Error::StreamRead(e.to_string())))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DEFAULT_MODEL;
    use crate::stream::drain;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> WorkersAiClient {
        WorkersAiClient::new_with_client("acct".to_string(), "token".to_string(), Client::new())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_run_streams_image_body() {
        let server = MockServer::start().await;
        let fake_image = vec![0x89, 0x50, 0x4E, 0x47, 1, 2, 3];

        Mock::given(method("POST"))
            .and(path(format!(
                "/client/v4/accounts/acct/ai/run/{}",
                DEFAULT_MODEL
            )))
            .and(header("authorization", "Bearer token"))
            .and(body_json(serde_json::json!({ "prompt": "a dragon" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(fake_image.clone()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let input = TextToImageInput {
            prompt: "a dragon".to_string(),
        };
        let stream = make_client(&server).run(DEFAULT_MODEL, &input).await.unwrap();

        assert_eq!(drain(stream).await.unwrap(), fake_image);
    }

    #[tokio::test]
    async fn test_run_api_error_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
            .mount(&server)
            .await;

        let input = TextToImageInput {
            prompt: "a dragon".to_string(),
        };
        let err = match make_client(&server).run(DEFAULT_MODEL, &input).await {
            Ok(_) => panic!("expected generation error"),
            Err(err) => err,
        };

        assert!(matches!(err, Error::Generation(ref msg) if msg.contains("model overloaded")));
    }

    #[tokio::test]
    async fn test_run_unreachable_host_is_generation_error() {
        let client = WorkersAiClient::new_with_client(
            "acct".to_string(),
            "token".to_string(),
            Client::new(),
        )
        .with_base_url("http://127.0.0.1:1".to_string());

        let input = TextToImageInput {
            prompt: "x".to_string(),
        };
        let result = client.run(DEFAULT_MODEL, &input).await;

        assert!(matches!(result, Err(Error::Generation(_))));
    }
}
