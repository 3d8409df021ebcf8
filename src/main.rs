use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use prepsearch::{
   Config,
   commands::{self, OutputOptions},
   config::{self, DEFAULT_QUERY_LIMIT, TITLE_SEARCH_LIMIT},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prepsearch", version, about = "Semantic search over interview problems")]
struct Cli {
   /// Config file (defaults to ~/.prepsearch/config.toml)
   #[arg(long, global = true, env = "PREPSEARCH_CONFIG")]
   config: Option<PathBuf>,

   /// Problem export to search (.json array or .jsonl)
   #[arg(long, global = true)]
   problems: Option<PathBuf>,

   #[command(subcommand)]
   command: Command,
}

#[derive(clap::Args, Clone, Copy)]
struct OutputArgs {
   /// Print results as JSON
   #[arg(long)]
   json: bool,

   /// Show similarity scores
   #[arg(long)]
   scores: bool,

   /// Disable colors and the spinner
   #[arg(long)]
   plain: bool,
}

impl From<OutputArgs> for OutputOptions {
   fn from(args: OutputArgs) -> Self {
      Self { json: args.json, scores: args.scores, plain: args.plain }
   }
}

#[derive(Subcommand)]
enum Command {
   /// Problems most associated with a company and role
   Company {
      name: String,

      #[arg(long)]
      role: Option<String>,

      #[command(flatten)]
      output: OutputArgs,
   },
   /// Free-text search, rewritten and re-ranked by the language model
   Query {
      text: String,

      #[arg(short, long, default_value_t = DEFAULT_QUERY_LIMIT)]
      limit: usize,

      #[command(flatten)]
      output: OutputArgs,
   },
   /// Problems whose title, slug, or question number contains the text
   Find {
      text: String,

      #[arg(short, long, default_value_t = TITLE_SEARCH_LIMIT)]
      limit: usize,

      #[command(flatten)]
      output: OutputArgs,
   },
   /// Print stored problems by id
   Show {
      #[arg(required = true)]
      ids: Vec<String>,

      #[command(flatten)]
      output: OutputArgs,
   },
   /// Check configuration and the problem store
   Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
   tracing_subscriber::fmt()
      .with_env_filter(
         EnvFilter::try_from_env("PREPSEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
      )
      .with_writer(std::io::stderr)
      .init();

   let cli = Cli::parse();

   let config_path = cli.config.clone().or_else(config::default_config_path);
   let mut config = Config::load(config_path.as_deref())?;
   if let Some(problems) = cli.problems {
      config.problems_path = Some(problems);
   }

   match cli.command {
      Command::Company { name, role, output } => {
         commands::company::execute(&config, name, role, output.into()).await
      },
      Command::Query { text, limit, output } => {
         commands::query::execute(&config, text, limit, output.into()).await
      },
      Command::Find { text, limit, output } => {
         commands::find::execute(&config, text, limit, output.into()).await
      },
      Command::Show { ids, output } => commands::show::execute(&config, ids, output.into()).await,
      Command::Doctor => commands::doctor::execute(&config, config_path.as_deref()).await,
   }
}
