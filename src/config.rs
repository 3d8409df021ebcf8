use std::{
   path::{Path, PathBuf},
   time::Duration,
};

use directories::BaseDirs;
use figment::{
   Figment,
   providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const CHAT_MODEL: &str = "gpt-3.5-turbo";

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_ROLE: &str = "SDE";
pub const COMPANY_RESULT_LIMIT: usize = 50;
pub const DEFAULT_QUERY_LIMIT: usize = 100;
pub const MAX_QUERY_LIMIT: usize = 500;
pub const TITLE_SEARCH_LIMIT: usize = 50;

/// Upper bound on how many similarity-ranked titles go into a re-rank prompt.
pub const RERANK_CANDIDATE_CAP: usize = 150;

/// Suffix appended to a company/role pair, and to a raw query when rewriting
/// is unavailable.
pub const QUERY_CONTEXT: &str = "interview questions software engineering coding problems";

pub const ENV_PREFIX: &str = "PREPSEARCH_";

pub fn data_dir() -> Option<PathBuf> {
   BaseDirs::new().map(|dirs| dirs.home_dir().join(".prepsearch"))
}

pub fn default_config_path() -> Option<PathBuf> {
   data_dir().map(|dir| dir.join("config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
   pub openai_api_key:     Option<String>,
   pub api_base:           String,
   pub embedding_model:    String,
   pub chat_model:         String,
   pub request_timeout_ms: u64,
   pub problems_path:      Option<PathBuf>,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         openai_api_key:     None,
         api_base:           DEFAULT_API_BASE.to_string(),
         embedding_model:    EMBEDDING_MODEL.to_string(),
         chat_model:         CHAT_MODEL.to_string(),
         request_timeout_ms: DEFAULT_TIMEOUT_MS,
         problems_path:      None,
      }
   }
}

impl Config {
   /// Loads defaults, then the TOML file, then `OPENAI_API_KEY`, then
   /// `PREPSEARCH_*` variables. A missing file is not an error.
   pub fn load(path: Option<&Path>) -> Result<Self> {
      let path = path.map(Path::to_path_buf).or_else(default_config_path);
      Ok(Self::figment(path.as_deref()).extract()?)
   }

   pub fn figment(path: Option<&Path>) -> Figment {
      let mut figment = Figment::from(Serialized::defaults(Self::default()));
      if let Some(path) = path {
         figment = figment.merge(Toml::file(path));
      }
      figment
         .merge(Env::raw().only(&["openai_api_key"]))
         .merge(Env::prefixed(ENV_PREFIX))
   }

   pub fn request_timeout(&self) -> Duration {
      Duration::from_millis(self.request_timeout_ms.max(1))
   }

   pub fn api_key(&self) -> Option<&str> {
      self
         .openai_api_key
         .as_deref()
         .map(str::trim)
         .filter(|key| !key.is_empty())
   }
}

#[cfg(test)]
mod tests {
   use figment::Jail;

   use super::*;

   #[test]
   fn defaults_without_file_or_env() {
      Jail::expect_with(|jail| {
         jail.clear_env();
         let config: Config = Config::figment(None).extract()?;
         assert_eq!(config.api_base, DEFAULT_API_BASE);
         assert_eq!(config.embedding_model, EMBEDDING_MODEL);
         assert_eq!(config.chat_model, CHAT_MODEL);
         assert_eq!(config.request_timeout(), Duration::from_secs(30));
         assert!(config.api_key().is_none());
         Ok(())
      });
   }

   #[test]
   fn file_then_env_layering() {
      Jail::expect_with(|jail| {
         jail.clear_env();
         jail.create_file(
            "config.toml",
            r#"
               chat_model = "gpt-4o-mini"
               request_timeout_ms = 5000
               problems_path = "problems.json"
            "#,
         )?;
         jail.set_env("OPENAI_API_KEY", "sk-from-openai-var");
         jail.set_env("PREPSEARCH_REQUEST_TIMEOUT_MS", "750");

         let config: Config = Config::figment(Some(Path::new("config.toml"))).extract()?;
         assert_eq!(config.chat_model, "gpt-4o-mini");
         assert_eq!(config.request_timeout(), Duration::from_millis(750));
         assert_eq!(config.problems_path, Some(PathBuf::from("problems.json")));
         assert_eq!(config.api_key(), Some("sk-from-openai-var"));
         Ok(())
      });
   }

   #[test]
   fn prefixed_key_overrides_openai_var() {
      Jail::expect_with(|jail| {
         jail.clear_env();
         jail.set_env("OPENAI_API_KEY", "sk-a");
         jail.set_env("PREPSEARCH_OPENAI_API_KEY", "sk-b");

         let config: Config = Config::figment(None).extract()?;
         assert_eq!(config.api_key(), Some("sk-b"));
         Ok(())
      });
   }

   #[test]
   fn blank_key_counts_as_missing() {
      let config = Config { openai_api_key: Some("   ".to_string()), ..Config::default() };
      assert!(config.api_key().is_none());
   }
}
