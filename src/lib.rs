//! Semantic search over interview-preparation problems.
//!
//! Queries are embedded and compared against precomputed problem-title
//! embeddings by cosine similarity; free-text queries are additionally
//! rewritten before embedding and re-ranked by a language model afterwards.

pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod llm;
pub mod search;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use search::SearchEngine;
pub use types::{Problem, ProblemId, SearchHit};
