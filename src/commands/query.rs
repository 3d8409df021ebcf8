use anyhow::Result;

use crate::{
   commands::{self, OutputOptions},
   config::Config,
};

pub async fn execute(
   config: &Config,
   query: String,
   limit: usize,
   options: OutputOptions,
) -> Result<()> {
   let engine = commands::open_engine(config)?;

   let hits =
      commands::with_spinner("Searching...", options, engine.rank_by_query(&query, limit)).await?;

   commands::print_hits(&hits, &format!("'{query}'"), options)
}
