use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque problem key. Exports from the document store wrap it as
/// `{"$oid": "..."}`; both shapes read into the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProblemId(pub String);

impl ProblemId {
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl fmt::Display for ProblemId {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

impl From<&str> for ProblemId {
   fn from(value: &str) -> Self {
      Self(value.to_string())
   }
}

impl From<String> for ProblemId {
   fn from(value: String) -> Self {
      Self(value)
   }
}

impl<'de> Deserialize<'de> for ProblemId {
   fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
      #[derive(Deserialize)]
      #[serde(untagged)]
      enum RawId {
         Plain(String),
         Number(u64),
         ObjectId {
            #[serde(rename = "$oid")]
            oid: String,
         },
      }

      Ok(match RawId::deserialize(deserializer)? {
         RawId::Plain(id) | RawId::ObjectId { oid: id } => Self(id),
         RawId::Number(n) => Self(n.to_string()),
      })
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
   Easy,
   Medium,
   Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
   #[serde(default)]
   pub name: Option<String>,
   #[serde(default)]
   pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
   #[serde(alias = "_id")]
   pub id:                   ProblemId,
   pub title:                String,
   #[serde(default)]
   pub title_slug:           Option<String>,
   #[serde(default)]
   pub frontend_question_id: Option<String>,
   #[serde(default)]
   pub difficulty:           Option<Difficulty>,
   #[serde(default)]
   pub topic_tags:           Vec<TopicTag>,
   /// Precomputed title embedding. `None` keeps the problem out of semantic
   /// search.
   #[serde(
      default,
      alias = "title_embeddings_OAI",
      deserialize_with = "lenient_vector",
      skip_serializing
   )]
   pub embedding:            Option<Vec<f32>>,
}

impl Problem {
   pub fn new(id: impl Into<ProblemId>, title: impl Into<String>) -> Self {
      Self {
         id:                   id.into(),
         title:                title.into(),
         title_slug:           None,
         frontend_question_id: None,
         difficulty:           None,
         topic_tags:           Vec::new(),
         embedding:            None,
      }
   }

   pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
      self.embedding = Some(embedding);
      self
   }

   pub fn has_embedding(&self) -> bool {
      self.embedding.as_ref().is_some_and(|v| !v.is_empty())
   }
}

/// Null components in a stored vector read as 0. A vector of any other shape
/// reads as `None` so one bad record only drops out of semantic search.
fn lenient_vector<'de, D>(deserializer: D) -> Result<Option<Vec<f32>>, D::Error>
where
   D: Deserializer<'de>,
{
   let raw = Value::deserialize(deserializer)?;
   let components = match raw {
      Value::Null => return Ok(None),
      Value::Array(components) => components,
      other => {
         tracing::debug!(found = %other, "ignoring embedding that is not an array");
         return Ok(None);
      },
   };

   let mut vector = Vec::with_capacity(components.len());
   for component in components {
      match component {
         Value::Null => vector.push(0.0),
         Value::Number(n) => match n.as_f64() {
            Some(x) => vector.push(x as f32),
            None => return Ok(None),
         },
         other => {
            tracing::debug!(found = %other, "ignoring embedding with a non-numeric component");
            return Ok(None);
         },
      }
   }
   Ok(Some(vector))
}

/// A problem paired with its similarity to the search query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
   #[serde(flatten)]
   pub problem: Problem,
   pub score:   f32,
}

impl SearchHit {
   pub fn title(&self) -> &str {
      &self.problem.title
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn reads_exported_document() {
      let doc = r#"{
         "_id": {"$oid": "65f0c0ffee"},
         "frontendQuestionId": "1",
         "title": "Two Sum",
         "titleSlug": "two-sum",
         "difficulty": "Easy",
         "topicTags": [{"name": "Array", "slug": "array", "id": "x"}],
         "acRate": 51.2,
         "title_embeddings_OAI": [0.5, null, -0.25]
      }"#;

      let problem: Problem = serde_json::from_str(doc).unwrap();
      assert_eq!(problem.id.as_str(), "65f0c0ffee");
      assert_eq!(problem.title_slug.as_deref(), Some("two-sum"));
      assert_eq!(problem.difficulty, Some(Difficulty::Easy));
      assert_eq!(problem.topic_tags[0].name.as_deref(), Some("Array"));
      assert_eq!(problem.embedding, Some(vec![0.5, 0.0, -0.25]));
   }

   #[test]
   fn malformed_embedding_reads_as_none() {
      for embedding in [
         r#"[{"$numberDouble": "NaN"}, 1.0]"#,
         r#"["0.5", 1.0]"#,
         r#"{"values": [1.0]}"#,
         "0.5",
         "null",
      ] {
         let doc =
            format!(r#"{{"id": "p1", "title": "Two Sum", "title_embeddings_OAI": {embedding}}}"#);
         let problem: Problem = serde_json::from_str(&doc).unwrap();
         assert!(problem.embedding.is_none(), "{embedding}");
      }
   }

   #[test]
   fn missing_embedding_is_none() {
      let problem: Problem = serde_json::from_str(r#"{"id": "p1", "title": "LRU Cache"}"#).unwrap();
      assert!(problem.embedding.is_none());
      assert!(!problem.has_embedding());
   }

   #[test]
   fn empty_embedding_does_not_count() {
      let problem = Problem::new("p1", "LRU Cache").with_embedding(Vec::new());
      assert!(!problem.has_embedding());
   }

   #[test]
   fn hit_serializes_without_embedding() {
      let hit = SearchHit {
         problem: Problem::new("p1", "Two Sum").with_embedding(vec![1.0, 2.0]),
         score:   0.75,
      };

      let value = serde_json::to_value(&hit).unwrap();
      assert_eq!(value["id"], "p1");
      assert_eq!(value["title"], "Two Sum");
      assert_eq!(value["score"], 0.75);
      assert!(value.get("embedding").is_none());
   }
}
