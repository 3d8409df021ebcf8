use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
   config::Config,
   embed::Embedder,
   error::{Error, Result},
   llm::openai::{build_client, check_status},
};

pub struct OpenAiEmbedder {
   client:   Client,
   endpoint: String,
   api_key:  String,
   model:    String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
   model: &'a str,
   input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
   #[serde(default)]
   data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
   #[serde(default)]
   embedding: Vec<f32>,
}

impl OpenAiEmbedder {
   pub fn new(config: &Config) -> Result<Self> {
      let api_key = config
         .api_key()
         .ok_or(Error::MissingConfig("openai_api_key"))?
         .to_string();

      Ok(Self {
         client: build_client(config)?,
         endpoint: format!("{}/embeddings", config.api_base.trim_end_matches('/')),
         api_key,
         model: config.embedding_model.clone(),
      })
   }
}

#[async_trait::async_trait]
impl Embedder for OpenAiEmbedder {
   async fn embed(&self, text: &str) -> Result<Vec<f32>> {
      let response = self
         .client
         .post(&self.endpoint)
         .bearer_auth(&self.api_key)
         .json(&EmbeddingRequest { model: &self.model, input: [text] })
         .send()
         .await?;

      let body: EmbeddingResponse = check_status(response).await?.json().await?;
      Ok(first_embedding(body))
   }
}

fn first_embedding(body: EmbeddingResponse) -> Vec<f32> {
   body
      .data
      .into_iter()
      .next()
      .map(|d| d.embedding)
      .unwrap_or_default()
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn request_wraps_single_input() {
      let body = serde_json::to_value(EmbeddingRequest {
         model: "text-embedding-3-small",
         input: ["swiggy sde1"],
      })
      .unwrap();
      assert_eq!(
         body,
         serde_json::json!({"model": "text-embedding-3-small", "input": ["swiggy sde1"]})
      );
   }

   #[test]
   fn reads_first_embedding() {
      let body: EmbeddingResponse = serde_json::from_str(
         r#"{"object": "list", "data": [{"object": "embedding", "index": 0, "embedding": [0.1, -0.2]}],
             "model": "text-embedding-3-small", "usage": {"prompt_tokens": 3, "total_tokens": 3}}"#,
      )
      .unwrap();
      assert_eq!(first_embedding(body), vec![0.1, -0.2]);
   }

   #[test]
   fn empty_data_yields_empty_vector() {
      let body: EmbeddingResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
      assert!(first_embedding(body).is_empty());

      let body: EmbeddingResponse = serde_json::from_str("{}").unwrap();
      assert!(first_embedding(body).is_empty());
   }

   #[test]
   fn new_requires_api_key() {
      let config = Config::default();
      assert!(matches!(
         OpenAiEmbedder::new(&config),
         Err(Error::MissingConfig("openai_api_key"))
      ));
   }

   #[test]
   fn endpoint_ignores_trailing_slash() {
      let config = Config {
         openai_api_key: Some("sk-test".to_string()),
         api_base: "http://localhost:8080/v1/".to_string(),
         ..Config::default()
      };
      let embedder = OpenAiEmbedder::new(&config).unwrap();
      assert_eq!(embedder.endpoint, "http://localhost:8080/v1/embeddings");
   }
}
