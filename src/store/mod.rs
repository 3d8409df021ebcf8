pub mod json;

use std::{collections::HashMap, sync::Arc};

pub use json::JsonStore;

use crate::{
   error::Result,
   types::{Problem, ProblemId},
};

/// Read-only access to stored problems.
#[async_trait::async_trait]
pub trait ProblemStore: Send + Sync {
   /// Every problem carrying a non-empty embedding, in storage order.
   async fn find_all_with_embeddings(&self) -> Result<Vec<Problem>>;

   async fn find_by_id(&self, id: &ProblemId) -> Result<Option<Problem>>;

   /// Problems for `ids` in the order requested; unknown ids are skipped.
   async fn find_by_ids(&self, ids: &[ProblemId]) -> Result<Vec<Problem>>;

   /// Case-insensitive substring match on title, slug, or frontend question
   /// id, in storage order, at most `limit`.
   async fn search_by_title(&self, query: &str, limit: usize) -> Result<Vec<Problem>>;
}

#[async_trait::async_trait]
impl<T: ProblemStore + ?Sized> ProblemStore for Arc<T> {
   async fn find_all_with_embeddings(&self) -> Result<Vec<Problem>> {
      (**self).find_all_with_embeddings().await
   }

   async fn find_by_id(&self, id: &ProblemId) -> Result<Option<Problem>> {
      (**self).find_by_id(id).await
   }

   async fn find_by_ids(&self, ids: &[ProblemId]) -> Result<Vec<Problem>> {
      (**self).find_by_ids(ids).await
   }

   async fn search_by_title(&self, query: &str, limit: usize) -> Result<Vec<Problem>> {
      (**self).search_by_title(query, limit).await
   }
}

/// Problems held in memory, for services that already loaded their pool.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
   problems: Vec<Problem>,
}

impl MemoryStore {
   pub fn new(problems: Vec<Problem>) -> Self {
      Self { problems }
   }

}

pub(crate) fn with_embeddings(problems: Vec<Problem>) -> Vec<Problem> {
   problems.into_iter().filter(Problem::has_embedding).collect()
}

fn title_matches(problem: &Problem, needle: &str) -> bool {
   let fields = [
      Some(problem.title.as_str()),
      problem.title_slug.as_deref(),
      problem.frontend_question_id.as_deref(),
   ];
   fields
      .into_iter()
      .flatten()
      .any(|field| field.to_lowercase().contains(needle))
}

pub(crate) fn search_titles<'a, I>(problems: I, query: &str, limit: usize) -> Vec<Problem>
where
   I: IntoIterator<Item = &'a Problem>,
{
   let needle = query.trim().to_lowercase();
   problems
      .into_iter()
      .filter(|p| title_matches(p, &needle))
      .take(limit)
      .cloned()
      .collect()
}

pub(crate) fn select_ids(problems: Vec<Problem>, ids: &[ProblemId]) -> Vec<Problem> {
   let mut by_id: HashMap<ProblemId, Problem> = HashMap::with_capacity(problems.len());
   for problem in problems {
      by_id.entry(problem.id.clone()).or_insert(problem);
   }

   ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}

#[async_trait::async_trait]
impl ProblemStore for MemoryStore {
   async fn find_all_with_embeddings(&self) -> Result<Vec<Problem>> {
      Ok(with_embeddings(self.problems.clone()))
   }

   async fn find_by_id(&self, id: &ProblemId) -> Result<Option<Problem>> {
      Ok(self.problems.iter().find(|p| &p.id == id).cloned())
   }

   async fn find_by_ids(&self, ids: &[ProblemId]) -> Result<Vec<Problem>> {
      Ok(select_ids(self.problems.clone(), ids))
   }

   async fn search_by_title(&self, query: &str, limit: usize) -> Result<Vec<Problem>> {
      Ok(search_titles(&self.problems, query, limit))
   }
}
