//! Turns a raw user phrase into a query better suited to embedding retrieval.

use std::{sync::Arc, time::Duration};

use crate::{
   config::QUERY_CONTEXT,
   llm::{ChatModel, CompletionRequest, complete_within},
};

const SYSTEM_PROMPT: &str =
   "You optimize search queries. Produce short, focused queries for finding coding interview \
    problems.";

pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 100;

/// The phrase used when the model cannot help.
pub fn fallback_query(query: &str) -> String {
   format!("{query} {QUERY_CONTEXT}")
}

pub fn rewrite_request(query: &str) -> CompletionRequest {
   let user = format!(
      "Rewrite the following search for interview questions so it retrieves the most relevant \
       coding problems.\n\nSearch: \"{query}\"\n\nThe rewritten query should mention:\n- the \
       company, if one is named\n- the role or level, if one is given (e.g. SDE1, SDE2, SWE)\n- \
       that the user wants interview coding problems\n\nReply with the rewritten query only."
   );

   CompletionRequest {
      system: SYSTEM_PROMPT.to_string(),
      user,
      temperature: TEMPERATURE,
      max_tokens: MAX_TOKENS,
   }
}

pub struct QueryRewriter {
   model:   Arc<dyn ChatModel>,
   timeout: Duration,
}

impl QueryRewriter {
   pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
      Self { model, timeout }
   }

   pub fn set_timeout(&mut self, timeout: Duration) {
      self.timeout = timeout;
   }

   /// Never fails: any model problem yields [`fallback_query`].
   pub async fn rewrite(&self, query: &str) -> String {
      match complete_within(&*self.model, &rewrite_request(query), self.timeout).await {
         Ok(Some(rewritten)) => {
            tracing::debug!(query, rewritten = %rewritten, "rewrote search query");
            rewritten
         },
         Ok(None) => {
            tracing::warn!(query, "query rewrite returned nothing, using fallback phrase");
            fallback_query(query)
         },
         Err(e) => {
            tracing::warn!(query, error = %e, "query rewrite failed, using fallback phrase");
            fallback_query(query)
         },
      }
   }
}
