pub mod company;
pub mod doctor;
pub mod find;
pub mod query;
pub mod show;

use std::{fmt::Write as _, future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::{
   config::Config,
   search::SearchEngine,
   store::JsonStore,
   types::{Difficulty, Problem, SearchHit},
};

#[derive(Default, Debug, Clone, Copy)]
pub struct OutputOptions {
   pub json:   bool,
   pub scores: bool,
   pub plain:  bool,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a, T: Serialize> {
   results: &'a [T],
}

pub fn open_store(config: &Config) -> Result<JsonStore> {
   let path = config
      .problems_path
      .as_ref()
      .context("no problem store configured; pass --problems or set problems_path")?;
   Ok(JsonStore::new(path))
}

pub fn open_engine(config: &Config) -> Result<SearchEngine> {
   let store = Arc::new(open_store(config)?);
   SearchEngine::from_config(config, store).context("failed to set up search providers")
}

/// Awaits `fut` behind a spinner unless output is machine-readable.
pub async fn with_spinner<F: Future>(message: &str, options: OutputOptions, fut: F) -> F::Output {
   if options.json || options.plain {
      return fut.await;
   }

   let spinner = ProgressBar::new_spinner();
   if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
      spinner.set_style(spinner_style);
   }
   spinner.enable_steady_tick(Duration::from_millis(100));
   spinner.set_message(message.to_string());

   let output = fut.await;
   spinner.finish_and_clear();
   output
}

pub fn print_json<T: Serialize>(results: &[T]) -> Result<()> {
   println!("{}", serde_json::to_string(&JsonOutput { results })?);
   Ok(())
}

fn difficulty_label(difficulty: Difficulty, plain: bool) -> String {
   let label = format!("[{difficulty:?}]");
   if plain {
      return label;
   }
   match difficulty {
      Difficulty::Easy => style(label).green().to_string(),
      Difficulty::Medium => style(label).yellow().to_string(),
      Difficulty::Hard => style(label).red().to_string(),
   }
}

fn problem_line(rank: usize, problem: &Problem, score: Option<f32>, plain: bool) -> String {
   let mut line = if plain {
      format!("{rank}. {}", problem.title)
   } else {
      format!("{} {}", style(format!("{rank}.")).bold().cyan(), style(&problem.title).bold())
   };

   if let Some(difficulty) = problem.difficulty {
      line.push(' ');
      line.push_str(&difficulty_label(difficulty, plain));
   }

   if let Some(score) = score {
      let score = format!("(score: {score:.3})");
      line.push(' ');
      if plain {
         line.push_str(&score);
      } else {
         line.push_str(&style(score).dim().to_string());
      }
   }

   line
}

fn detail_line(problem: &Problem, plain: bool) -> String {
   let mut detail = format!("id: {}", problem.id);
   if let Some(slug) = &problem.title_slug {
      let _ = write!(detail, "  slug: {slug}");
   }
   let tags: Vec<&str> = problem
      .topic_tags
      .iter()
      .filter_map(|t| t.name.as_deref())
      .collect();
   if !tags.is_empty() {
      let _ = write!(detail, "  tags: {}", tags.join(", "));
   }

   if plain {
      format!("   {detail}")
   } else {
      format!("   {}", style(detail).dim())
   }
}

pub fn print_hits(hits: &[SearchHit], heading: &str, options: OutputOptions) -> Result<()> {
   if options.json {
      return print_json(hits);
   }

   if hits.is_empty() {
      println!("No problems found for {heading}");
      return Ok(());
   }

   if options.plain {
      println!("Results for {heading}\n");
   } else {
      println!("\n{}\n", style(format!("Results for {heading}")).bold());
   }

   for (i, hit) in hits.iter().enumerate() {
      let score = options.scores.then_some(hit.score);
      println!("{}", problem_line(i + 1, &hit.problem, score, options.plain));
      println!("{}", detail_line(&hit.problem, options.plain));
   }

   Ok(())
}

pub fn print_problems(problems: &[Problem], options: OutputOptions) -> Result<()> {
   if options.json {
      return print_json(problems);
   }

   for (i, problem) in problems.iter().enumerate() {
      println!("{}", problem_line(i + 1, problem, None, options.plain));
      println!("{}", detail_line(problem, options.plain));
   }

   Ok(())
}
