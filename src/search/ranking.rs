//! First-pass ranking: cosine similarity of every embedded candidate against
//! the query vector.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::{
   search::similarity::cosine_similarity,
   types::{Problem, SearchHit},
};

/// Scores every well-formed candidate against `query`, keeping input order.
///
/// Candidates whose embedding is missing or whose dimension differs from the
/// query are dropped rather than scored.
pub fn score_candidates(query: &[f32], candidates: Vec<Problem>) -> Vec<SearchHit> {
   candidates
      .into_par_iter()
      .filter_map(|problem| {
         let score = match problem.embedding.as_deref() {
            Some(embedding) if !embedding.is_empty() && embedding.len() == query.len() => {
               cosine_similarity(query, embedding)
            },
            other => {
               tracing::debug!(
                  id = %problem.id,
                  dims = other.map_or(0, <[f32]>::len),
                  expected = query.len(),
                  "skipping candidate with malformed embedding"
               );
               return None;
            },
         };
         Some(SearchHit { problem, score })
      })
      .collect()
}

/// Sorts by score, highest first. The sort is stable, so equal scores keep
/// repository order.
pub fn sort_by_score(hits: &mut [SearchHit]) {
   hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Scores, sorts, and keeps the best `limit` candidates.
pub fn rank(query: &[f32], candidates: Vec<Problem>, limit: usize) -> Vec<SearchHit> {
   let total = candidates.len();
   let mut hits = score_candidates(query, candidates);
   let scored = hits.len();
   sort_by_score(&mut hits);
   hits.truncate(limit);

   tracing::debug!(total, scored, kept = hits.len(), "ranked candidate pool");
   hits
}

#[cfg(test)]
mod tests {
   use super::*;

   fn problem(id: &str, embedding: Option<Vec<f32>>) -> Problem {
      let problem = Problem::new(id, format!("Problem {id}"));
      match embedding {
         Some(v) => problem.with_embedding(v),
         None => problem,
      }
   }

   fn ids(hits: &[SearchHit]) -> Vec<&str> {
      hits.iter().map(|h| h.problem.id.as_str()).collect()
   }

   #[test]
   fn orders_by_similarity() {
      let query = [1.0, 0.0];
      let candidates = vec![
         problem("far", Some(vec![0.0, 1.0])),
         problem("near", Some(vec![1.0, 0.1])),
         problem("mid", Some(vec![1.0, 1.0])),
      ];

      let hits = rank(&query, candidates, 10);
      assert_eq!(ids(&hits), ["near", "mid", "far"]);
      assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
   }

   #[test]
   fn ties_keep_repository_order() {
      let query = [1.0, 0.0];
      let candidates = (0..20)
         .map(|i| problem(&format!("p{i:02}"), Some(vec![2.0, 0.0])))
         .collect();

      let hits = rank(&query, candidates, 20);
      let expected: Vec<String> = (0..20).map(|i| format!("p{i:02}")).collect();
      assert_eq!(ids(&hits), expected);
   }

   #[test]
   fn zero_vector_candidate_scores_zero_and_stays() {
      let query = [1.0, 0.0];
      let candidates = vec![
         problem("zero", Some(vec![0.0, 0.0])),
         problem("neg", Some(vec![-1.0, 0.0])),
         problem("pos", Some(vec![1.0, 0.0])),
      ];

      let hits = rank(&query, candidates, 10);
      assert_eq!(ids(&hits), ["pos", "zero", "neg"]);
      assert_eq!(hits[1].score, 0.0);
   }

   #[test]
   fn malformed_candidates_are_dropped() {
      let query = [1.0, 0.0, 0.0];
      let candidates = vec![
         problem("missing", None),
         problem("empty", Some(Vec::new())),
         problem("short", Some(vec![1.0, 0.0])),
         problem("ok", Some(vec![0.5, 0.5, 0.0])),
      ];

      let hits = score_candidates(&query, candidates);
      assert_eq!(ids(&hits), ["ok"]);
   }

   #[test]
   fn truncates_to_limit() {
      let query = [1.0];
      let candidates = (0..80)
         .map(|i| problem(&i.to_string(), Some(vec![1.0])))
         .collect();

      assert_eq!(rank(&query, candidates, 50).len(), 50);
   }

   #[test]
   fn empty_pool() {
      assert!(rank(&[1.0], Vec::new(), 10).is_empty());
   }
}
