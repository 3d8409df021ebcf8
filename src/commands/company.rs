use anyhow::Result;

use crate::{
   commands::{self, OutputOptions},
   config::{Config, DEFAULT_ROLE},
};

pub async fn execute(
   config: &Config,
   company: String,
   role: Option<String>,
   options: OutputOptions,
) -> Result<()> {
   let engine = commands::open_engine(config)?;

   let hits = commands::with_spinner(
      "Ranking problems...",
      options,
      engine.rank_by_company(&company, role.as_deref()),
   )
   .await?;

   let role = role.as_deref().unwrap_or(DEFAULT_ROLE);
   commands::print_hits(&hits, &format!("{company} ({role})"), options)
}
