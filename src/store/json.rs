use std::path::{Path, PathBuf};

use crate::{
   error::{Error, Result},
   store::{ProblemStore, search_titles, select_ids, with_embeddings},
   types::{Problem, ProblemId},
};

/// Problems read from a document-store export.
///
/// Accepts a JSON array, or one document per line for `.jsonl` / `.ndjson`
/// files. The file is read again on every call so the candidate pool always
/// reflects what is on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
   path: PathBuf,
}

impl JsonStore {
   pub fn new(path: impl Into<PathBuf>) -> Self {
      Self { path: path.into() }
   }

   pub fn path(&self) -> &Path {
      &self.path
   }

   pub async fn load_all(&self) -> Result<Vec<Problem>> {
      let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
         Error::Store(format!("failed to read {}: {e}", self.path.display()))
      })?;

      if self.is_line_delimited() {
         parse_lines(&content)
      } else {
         Ok(serde_json::from_str(&content)?)
      }
   }

   fn is_line_delimited(&self) -> bool {
      self.path.extension().is_some_and(|ext| {
         ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson")
      })
   }
}

fn parse_lines(content: &str) -> Result<Vec<Problem>> {
   content
      .lines()
      .enumerate()
      .filter(|(_, line)| !line.trim().is_empty())
      .map(|(i, line)| {
         serde_json::from_str(line)
            .map_err(|e| Error::Store(format!("invalid document on line {}: {e}", i + 1)))
      })
      .collect()
}

#[async_trait::async_trait]
impl ProblemStore for JsonStore {
   async fn find_all_with_embeddings(&self) -> Result<Vec<Problem>> {
      Ok(with_embeddings(self.load_all().await?))
   }

   async fn find_by_id(&self, id: &ProblemId) -> Result<Option<Problem>> {
      Ok(self.load_all().await?.into_iter().find(|p| &p.id == id))
   }

   async fn find_by_ids(&self, ids: &[ProblemId]) -> Result<Vec<Problem>> {
      Ok(select_ids(self.load_all().await?, ids))
   }

   async fn search_by_title(&self, query: &str, limit: usize) -> Result<Vec<Problem>> {
      Ok(search_titles(&self.load_all().await?, query, limit))
   }
}
