//! Data models and structures
//!
//! Defines the card entity returned to callers and the metadata record
//! persisted alongside each generated image.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted metadata record for a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardMetadata {
    pub title: String,
    pub description: String,
}

impl CardMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A stored trading card, reconstructed from its metadata record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Where the image can be fetched from; derived from `id`, never stored.
    pub image_url: String,
}

impl Card {
    pub fn new(id: String, metadata: CardMetadata, image_url: String) -> Self {
        Self {
            id,
            title: metadata.title,
            description: metadata.description,
            image_url,
        }
    }
}

/// The two records every card is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Metadata,
    Image,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Metadata => write!(f, "metadata"),
            RecordKind::Image => write!(f, "image"),
        }
    }
}
