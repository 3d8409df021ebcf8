//! Text embedding providers.
//!
//! The search pipeline embeds one query text per call and compares it against
//! title embeddings precomputed by the same model.

pub mod openai;

use std::sync::Arc;

pub use openai::OpenAiEmbedder;

use crate::error::Result;

/// Turns text into a dense vector.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
   /// Embeds a single text. An empty vector means the provider had nothing to
   /// return.
   async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait::async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
   async fn embed(&self, text: &str) -> Result<Vec<f32>> {
      (**self).embed(text).await
   }
}
