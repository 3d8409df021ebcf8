use anyhow::{Result, bail};

use crate::{
   commands::{self, OutputOptions},
   config::Config,
   store::ProblemStore,
};

pub async fn execute(
   config: &Config,
   text: String,
   limit: usize,
   options: OutputOptions,
) -> Result<()> {
   let text = text.trim();
   if text.is_empty() {
      bail!("search text must not be empty");
   }

   let store = commands::open_store(config)?;
   let problems = store.search_by_title(text, limit).await?;
   tracing::debug!(matches = problems.len(), "title search complete");

   if problems.is_empty() && !options.json {
      println!("No problem titles match {text:?}");
      return Ok(());
   }

   commands::print_problems(&problems, options)
}

#[cfg(test)]
mod tests {
   use std::fs;

   use tempfile::TempDir;

   use super::*;

   #[tokio::test]
   async fn blank_text_is_rejected() {
      let config = Config { problems_path: Some("problems.json".into()), ..Config::default() };
      let err = execute(&config, "  ".to_string(), 50, OutputOptions::default())
         .await
         .unwrap_err();
      assert!(err.to_string().contains("must not be empty"));
   }

   #[tokio::test]
   async fn prints_matches_from_store() {
      let dir = TempDir::new().unwrap();
      let path = dir.path().join("problems.json");
      let doc = r#"[{"_id": "1", "title": "Two Sum", "frontendQuestionId": "1"}]"#;
      fs::write(&path, doc).unwrap();

      let config = Config { problems_path: Some(path), ..Config::default() };
      let options = OutputOptions { plain: true, ..OutputOptions::default() };
      execute(&config, "two".to_string(), 50, options).await.unwrap();
      execute(&config, "graph".to_string(), 50, options).await.unwrap();
   }
}
