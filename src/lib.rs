//! Trading card generator - illustrated cards from a title and description
//!
//! Artwork is produced by an external text-to-image model, then stored as two
//! records (JSON metadata and raw image bytes) that share one card id.

pub mod ai;
pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod generator;
pub mod identity;
pub mod manager;
pub mod models;
pub mod prompts;
pub mod store;
pub mod stream;

pub use error::{Error, Result};
