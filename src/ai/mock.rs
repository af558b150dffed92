use super::{TextToImageInput, TextToImageService};
use crate::stream::{self, ByteStream};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use std::sync::{Arc, Mutex};

/// A tiny valid PNG, returned when no response is configured.
pub const DEFAULT_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44,
    0x41, // IDAT chunk
    0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2, 0x25,
    0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Clone)]
enum MockResponse {
    Chunks(Vec<Vec<u8>>),
    /// Yields the chunks, then fails.
    Broken(Vec<Vec<u8>>),
    Fail(String),
}

/// Recorded `(model, input)` pair for one `run` call.
pub type RecordedCall = (String, TextToImageInput);

#[derive(Clone)]
pub struct MockTextToImageClient {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTextToImageClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_response(self, image: Vec<u8>) -> Self {
        self.with_image_chunks(vec![image])
    }

    pub fn with_image_chunks(self, chunks: Vec<Vec<u8>>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Chunks(chunks));
        self
    }

    pub fn with_broken_stream(self, chunks: Vec<Vec<u8>>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Broken(chunks));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Fail(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockTextToImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextToImageService for MockTextToImageClient {
    async fn run(&self, model: &str, input: &TextToImageInput) -> Result<ByteStream> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((model.to_string(), input.clone()));
            calls.len()
        };

        let response = {
            let responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                MockResponse::Chunks(vec![DEFAULT_PNG.to_vec()])
            } else {
                responses[(count - 1) % responses.len()].clone()
            }
        };

        match response {
            MockResponse::Chunks(chunks) => Ok(stream::from_chunks(chunks)),
            MockResponse::Broken(chunks) => {
                let tail = futures_util::stream::once(async {
                    Err::<Bytes, _>(Error::StreamRead("mock stream interrupted".to_string()))
                });
                Ok(stream::from_chunks(chunks).chain(tail).boxed())
            }
            MockResponse::Fail(message) => Err(Error::Generation(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::drain;

    fn input(prompt: &str) -> TextToImageInput {
        TextToImageInput {
            prompt: prompt.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_default_response_is_png() {
        let client = MockTextToImageClient::new();

        let stream = client.run("model", &input("p")).await.unwrap();
        assert_eq!(drain(stream).await.unwrap(), DEFAULT_PNG);
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let client = MockTextToImageClient::new().with_image_response(vec![1]);
        let probe = client.clone();

        client.run("model-a", &input("first")).await.unwrap();
        client.run("model-b", &input("second")).await.unwrap();

        assert_eq!(probe.get_call_count(), 2);
        assert_eq!(
            probe.get_calls(),
            vec![
                ("model-a".to_string(), input("first")),
                ("model-b".to_string(), input("second")),
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_cycles_responses() {
        let client = MockTextToImageClient::new()
            .with_image_response(vec![1])
            .with_failure("down");

        assert!(client.run("m", &input("a")).await.is_ok());
        assert!(matches!(
            client.run("m", &input("b")).await,
            Err(Error::Generation(_))
        ));
        assert!(client.run("m", &input("c")).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_broken_stream_fails_on_drain() {
        let client = MockTextToImageClient::new().with_broken_stream(vec![vec![1, 2]]);

        let stream = client.run("m", &input("p")).await.unwrap();
        assert!(matches!(drain(stream).await, Err(Error::StreamRead(_))));
    }
}
