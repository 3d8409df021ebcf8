use std::time::Duration;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
   /// The embedding provider produced no vector for the search query itself.
   #[error("embedding unavailable for search query: {0}")]
   EmbeddingUnavailable(String),

   #[error("invalid search request: {0}")]
   InvalidRequest(String),

   #[error("provider error: {0}")]
   Provider(String),

   #[error("provider call timed out after {0:?}")]
   Timeout(Duration),

   #[error("missing configuration: {0}")]
   MissingConfig(&'static str),

   #[error("store error: {0}")]
   Store(String),

   #[error("ranking task failed: {0}")]
   Task(#[from] tokio::task::JoinError),

   #[error(transparent)]
   Json(#[from] serde_json::Error),

   #[error(transparent)]
   Http(#[from] reqwest::Error),

   #[error(transparent)]
   Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for Error {
   fn from(err: figment::Error) -> Self {
      Self::Config(Box::new(err))
   }
}
