use std::{collections::BTreeMap, path::Path};

use anyhow::Result;
use console::style;

use crate::{config::Config, store::JsonStore, types::Problem};

#[derive(Debug, Default, PartialEq, Eq)]
struct StoreReport {
   total:    usize,
   embedded: usize,
   /// Embedding dimension -> number of problems carrying it.
   dims:     BTreeMap<usize, usize>,
}

impl StoreReport {
   fn from_problems(problems: &[Problem]) -> Self {
      let mut report = Self { total: problems.len(), ..Self::default() };
      for embedding in problems.iter().filter_map(|p| p.embedding.as_ref()) {
         if embedding.is_empty() {
            continue;
         }
         report.embedded += 1;
         *report.dims.entry(embedding.len()).or_default() += 1;
      }
      report
   }

   fn mixed_dimensions(&self) -> bool {
      self.dims.len() > 1
   }
}

fn check(ok: bool, label: &str, detail: impl std::fmt::Display) {
   let symbol = if ok {
      style("✓").green()
   } else {
      style("✗").red()
   };
   println!("{symbol} {label}: {}", style(detail).dim());
}

fn note(label: &str, detail: impl std::fmt::Display) {
   println!("{} {label}: {}", style("·").dim(), style(detail).dim());
}

/// Whether the config file exists, and how to describe it. A missing file is
/// normal: built-in defaults and the environment still apply.
fn config_file_status(path: Option<&Path>) -> (bool, String) {
   match path {
      Some(path) if path.exists() => (true, path.display().to_string()),
      Some(path) => (false, format!("{} not present (defaults used)", path.display())),
      None => (false, "no home directory found (defaults used)".to_string()),
   }
}

pub async fn execute(config: &Config, config_path: Option<&Path>) -> Result<()> {
   println!("{}\n", style("prepsearch doctor").bold());

   println!("{}", style("Configuration").bold());
   match config_file_status(config_path) {
      (true, detail) => check(true, "Config file", detail),
      (false, detail) => note("Config file", detail),
   }
   check(
      config.api_key().is_some(),
      "OpenAI API key",
      if config.api_key().is_some() { "set" } else { "missing" },
   );
   check(true, "API base", &config.api_base);
   check(true, "Embedding model", &config.embedding_model);
   check(true, "Chat model", &config.chat_model);
   check(true, "Request timeout", format!("{:?}", config.request_timeout()));
   println!();

   println!("{}", style("Problem store").bold());
   let Some(path) = &config.problems_path else {
      check(false, "Problems", "not configured (pass --problems or set problems_path)");
      return Ok(());
   };

   let store = JsonStore::new(path);
   match store.load_all().await {
      Ok(problems) => {
         let report = StoreReport::from_problems(&problems);
         check(true, "Problems", format!("{} in {}", report.total, path.display()));
         check(
            report.embedded > 0,
            "With embeddings",
            format!("{} of {}", report.embedded, report.total),
         );
         let dims = report
            .dims
            .iter()
            .map(|(dim, count)| format!("{dim} ({count})"))
            .collect::<Vec<_>>()
            .join(", ");
         check(
            !report.mixed_dimensions(),
            "Embedding dimensions",
            if dims.is_empty() { "none".to_string() } else { dims },
         );
      },
      Err(e) => check(false, "Problems", e),
   }

   Ok(())
}
