//! Card artwork generation
//!
//! Turns a card's title and description into a prompt and hands it to the
//! text-to-image model. The output stream is returned unread.

use crate::ai::{TextToImageInput, TextToImageService};
use crate::prompts;
use crate::stream::ByteStream;
use crate::Result;
use std::sync::Arc;

pub struct CardGenerator {
    ai: Arc<dyn TextToImageService>,
    model: String,
}

impl CardGenerator {
    pub fn new(ai: Arc<dyn TextToImageService>, model: impl Into<String>) -> Self {
        Self {
            ai,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_input(title: &str, description: &str) -> TextToImageInput {
        TextToImageInput {
            prompt: prompts::card_artwork(title, description),
        }
    }

    /// One model invocation, no retry. Failures surface as `Error::Generation`.
    pub async fn generate(&self, title: &str, description: &str) -> Result<ByteStream> {
        let input = Self::build_input(title, description);
        tracing::info!(
            "Generating card artwork with {} ({} char prompt)",
            self.model,
            input.prompt.len()
        );

        self.ai.run(&self.model, &input).await
    }
}
