//! Chat-completion language models used for query rewriting and re-ranking.

pub mod openai;

use std::{sync::Arc, time::Duration};

pub use openai::OpenAiChat;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
   pub system:      String,
   pub user:        String,
   pub temperature: f32,
   pub max_tokens:  u32,
}

#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
   /// Returns the model's reply, or `None` when it produced no content.
   async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;
}

#[async_trait::async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Arc<T> {
   async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
      (**self).complete(request).await
   }
}

/// Runs one completion bounded by `timeout`; blank replies collapse to `None`.
pub async fn complete_within(
   model: &dyn ChatModel,
   request: &CompletionRequest,
   timeout: Duration,
) -> Result<Option<String>> {
   let reply = tokio::time::timeout(timeout, model.complete(request))
      .await
      .map_err(|_| Error::Timeout(timeout))??;

   Ok(reply
      .map(|text| text.trim().to_string())
      .filter(|text| !text.is_empty()))
}
