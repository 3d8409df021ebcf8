pub mod ranking;
pub mod rerank;
pub mod rewrite;
pub mod similarity;

use std::{sync::Arc, time::Duration};

pub use rerank::{LlmReranker, RankingParse};
pub use rewrite::QueryRewriter;

use crate::{
   config::{COMPANY_RESULT_LIMIT, Config, DEFAULT_ROLE, MAX_QUERY_LIMIT, QUERY_CONTEXT},
   embed::{Embedder, OpenAiEmbedder},
   error::{Error, Result},
   llm::{ChatModel, OpenAiChat},
   store::ProblemStore,
   types::{Problem, SearchHit},
};

/// Semantic problem search: rewrite, embed, score, and optionally re-rank.
///
/// Every call reads the candidate pool fresh from the store and keeps no
/// state between calls.
pub struct SearchEngine {
   store:    Arc<dyn ProblemStore>,
   embedder: Arc<dyn Embedder>,
   rewriter: QueryRewriter,
   reranker: LlmReranker,
   timeout:  Duration,
}

impl SearchEngine {
   pub fn new(
      store: Arc<dyn ProblemStore>,
      embedder: Arc<dyn Embedder>,
      model: Arc<dyn ChatModel>,
      timeout: Duration,
   ) -> Self {
      Self {
         store,
         embedder,
         rewriter: QueryRewriter::new(model.clone(), timeout),
         reranker: LlmReranker::new(model, timeout),
         timeout,
      }
   }

   /// Builds OpenAI-backed providers from `config`.
   pub fn from_config(config: &Config, store: Arc<dyn ProblemStore>) -> Result<Self> {
      let embedder = Arc::new(OpenAiEmbedder::new(config)?);
      let model = Arc::new(OpenAiChat::new(config)?);
      Ok(Self::new(store, embedder, model, config.request_timeout()))
   }

   /// Bounds each embedding and completion call.
   pub fn with_timeout(mut self, timeout: Duration) -> Self {
      self.timeout = timeout;
      self.rewriter.set_timeout(timeout);
      self.reranker.set_timeout(timeout);
      self
   }

   /// Top problems for a company and role, best first, at most
   /// [`COMPANY_RESULT_LIMIT`]. A missing or blank role means `"SDE"`.
   #[tracing::instrument(skip(self))]
   pub async fn rank_by_company(
      &self,
      company: &str,
      role: Option<&str>,
   ) -> Result<Vec<SearchHit>> {
      let company = company.trim();
      if company.is_empty() {
         return Err(Error::InvalidRequest("company name must not be empty".to_string()));
      }
      let role = role
         .map(str::trim)
         .filter(|r| !r.is_empty())
         .unwrap_or(DEFAULT_ROLE);

      let query = format!("{company} {role} {QUERY_CONTEXT}");
      let vector = self.embed_query(&query).await?;
      let candidates = self.store.find_all_with_embeddings().await?;
      let hits = rank_pool(vector, candidates, COMPANY_RESULT_LIMIT).await?;

      tracing::info!(results = hits.len(), "company search complete");
      Ok(hits)
   }

   /// Top problems for a free-text query, at most `limit` (capped at
   /// [`MAX_QUERY_LIMIT`]).
   ///
   /// A `limit` of 0 returns nothing without touching any provider. Rewriting
   /// and re-ranking degrade silently; only a missing query embedding fails.
   #[tracing::instrument(skip(self))]
   pub async fn rank_by_query(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
      let limit = limit.min(MAX_QUERY_LIMIT);
      if limit == 0 {
         return Ok(Vec::new());
      }
      let query = query.trim();
      if query.is_empty() {
         return Err(Error::InvalidRequest("search query must not be empty".to_string()));
      }

      let rewritten = self.rewriter.rewrite(query).await;
      let vector = self.embed_query(&rewritten).await?;
      let candidates = self.store.find_all_with_embeddings().await?;
      let hits = rank_pool(vector, candidates, limit).await?;

      if hits.is_empty() {
         tracing::info!("no embedded candidates matched, skipping re-rank");
         return Ok(hits);
      }

      let hits = self.reranker.rerank(query, hits, limit).await;
      tracing::info!(results = hits.len(), "query search complete");
      Ok(hits)
   }

   async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
      let vector = match tokio::time::timeout(self.timeout, self.embedder.embed(text)).await {
         Ok(Ok(vector)) => vector,
         Ok(Err(e)) => return Err(Error::EmbeddingUnavailable(e.to_string())),
         Err(_) => {
            return Err(Error::EmbeddingUnavailable(format!("timed out after {:?}", self.timeout)));
         },
      };

      if vector.is_empty() {
         return Err(Error::EmbeddingUnavailable("provider returned no vector".to_string()));
      }

      tracing::debug!(dims = vector.len(), "embedded search query");
      Ok(vector)
   }
}

/// Runs the CPU-bound scoring pass on the blocking pool so large candidate
/// pools don't stall the async workers.
async fn rank_pool(
   vector: Vec<f32>,
   candidates: Vec<Problem>,
   limit: usize,
) -> Result<Vec<SearchHit>> {
   Ok(tokio::task::spawn_blocking(move || ranking::rank(&vector, candidates, limit)).await?)
}
