//! Second-pass ordering of similarity-ranked hits by a language model.
//!
//! The model sees a numbered list of titles and answers with a
//! comma-separated permutation. Anything it gets wrong collapses back to the
//! similarity order, so this stage can only improve a result, never fail it.

use std::{fmt::Write as _, sync::Arc, time::Duration};

use crate::{
   config::RERANK_CANDIDATE_CAP,
   llm::{ChatModel, CompletionRequest, complete_within},
   types::SearchHit,
};

const SYSTEM_PROMPT: &str =
   "You rank coding interview problems by how relevant they are to a search. Reply with numbers \
    only.";

pub const TEMPERATURE: f32 = 0.2;
pub const MAX_TOKENS: u32 = 200;

/// Outcome of reading a model's ranking reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingParse {
   /// Distinct 0-based indices into the eligible candidates, best first.
   Ranked(Vec<usize>),
   /// Nothing usable; keep similarity order.
   Fallback,
}

/// Reads `reply` as comma-separated 1-based positions into `eligible`
/// candidates, keeping at most `limit`.
///
/// Each token is read like an integer prefix, so `" 3"`, `"3."` and `"+3"` all
/// mean 3. Tokens that are non-numeric, out of range, or repeated are skipped.
pub fn parse_ranking(reply: &str, eligible: usize, limit: usize) -> RankingParse {
   let mut seen = vec![false; eligible];
   let mut order = Vec::with_capacity(limit.min(eligible));

   for token in reply.split(',') {
      if order.len() >= limit {
         break;
      }
      let Some(position) = leading_int(token) else {
         continue;
      };
      let Some(idx) = usize::try_from(position - 1).ok().filter(|&i| i < eligible) else {
         continue;
      };
      if !std::mem::replace(&mut seen[idx], true) {
         order.push(idx);
      }
   }

   if order.is_empty() {
      RankingParse::Fallback
   } else {
      RankingParse::Ranked(order)
   }
}

fn leading_int(token: &str) -> Option<i64> {
   let token = token.trim();
   let (negative, rest) = match token.as_bytes().first() {
      Some(b'-') => (true, &token[1..]),
      Some(b'+') => (false, &token[1..]),
      _ => (false, token),
   };
   let end = rest
      .find(|c: char| !c.is_ascii_digit())
      .unwrap_or(rest.len());
   let value: i64 = rest[..end].parse().ok()?;
   Some(if negative { -value } else { value })
}

/// Emits `eligible[i]` for each `i` in `order`, then tops up with the unused
/// eligible hits in their original order until `limit` is reached.
pub fn apply_ranking(eligible: Vec<SearchHit>, order: &[usize], limit: usize) -> Vec<SearchHit> {
   let mut slots: Vec<Option<SearchHit>> = eligible.into_iter().map(Some).collect();
   let mut ranked = Vec::with_capacity(limit.min(slots.len()));

   for &idx in order {
      if ranked.len() >= limit {
         break;
      }
      if let Some(hit) = slots.get_mut(idx).and_then(Option::take) {
         ranked.push(hit);
      }
   }

   for hit in slots.into_iter().flatten() {
      if ranked.len() >= limit {
         break;
      }
      ranked.push(hit);
   }

   ranked
}

pub fn rerank_request(query: &str, eligible: &[SearchHit], limit: usize) -> CompletionRequest {
   let mut listing = String::new();
   for (i, hit) in eligible.iter().enumerate() {
      let _ = writeln!(listing, "{}. {}", i + 1, hit.title());
   }

   let user = format!(
      "Rank these coding problems by relevance to a search for interview questions.\n\nSearch: \
       \"{query}\"\n\nProblems:\n{listing}\nReply with ONLY a comma-separated list of problem \
       numbers (1-{count}), most relevant first. Give exactly {limit} numbers.",
      count = eligible.len(),
   );

   CompletionRequest {
      system: SYSTEM_PROMPT.to_string(),
      user,
      temperature: TEMPERATURE,
      max_tokens: MAX_TOKENS,
   }
}

pub struct LlmReranker {
   model:   Arc<dyn ChatModel>,
   timeout: Duration,
}

impl LlmReranker {
   pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
      Self { model, timeout }
   }

   pub fn set_timeout(&mut self, timeout: Duration) {
      self.timeout = timeout;
   }

   /// Reorders `hits` (already similarity-ranked) and returns at most `limit`.
   ///
   /// Only the first [`RERANK_CANDIDATE_CAP`] hits are shown to the model.
   /// Any failure returns the first `limit` hits unchanged.
   pub async fn rerank(
      &self,
      query: &str,
      mut hits: Vec<SearchHit>,
      limit: usize,
   ) -> Vec<SearchHit> {
      if hits.is_empty() || limit == 0 {
         return Vec::new();
      }

      let eligible = hits.len().min(RERANK_CANDIDATE_CAP);
      let request = rerank_request(query, &hits[..eligible], limit);

      let parsed = match complete_within(&*self.model, &request, self.timeout).await {
         Ok(Some(reply)) => {
            let parsed = parse_ranking(&reply, eligible, limit);
            if parsed == RankingParse::Fallback {
               tracing::warn!(
                  query,
                  reply = %reply,
                  "unusable re-rank reply, keeping similarity order"
               );
            }
            parsed
         },
         Ok(None) => {
            tracing::warn!(query, "re-rank returned nothing, keeping similarity order");
            RankingParse::Fallback
         },
         Err(e) => {
            tracing::warn!(query, error = %e, "re-rank failed, keeping similarity order");
            RankingParse::Fallback
         },
      };

      match parsed {
         RankingParse::Ranked(order) => {
            tracing::debug!(query, eligible, ranked = order.len(), "applied model ranking");
            hits.truncate(eligible);
            apply_ranking(hits, &order, limit)
         },
         RankingParse::Fallback => {
            hits.truncate(limit);
            hits
         },
      }
   }
}
