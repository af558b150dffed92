//! Text-to-image model integration
//!
//! The generative model is an external service: given a prompt it produces
//! image bytes as a stream of unknown length.

pub mod mock;
pub mod workers;

pub use mock::MockTextToImageClient;
pub use workers::WorkersAiClient;

use crate::stream::ByteStream;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "@cf/stabilityai/stable-diffusion-xl-base-1.0";

/// Request body sent to a text-to-image model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextToImageInput {
    pub prompt: String,
}

#[async_trait]
pub trait TextToImageService: Send + Sync {
    /// Invoke `model` with `input`. The returned stream has not been read yet.
    async fn run(&self, model: &str, input: &TextToImageInput) -> Result<ByteStream>;
}
