use anyhow::{Result, bail};

use crate::{
   commands::{self, OutputOptions},
   config::Config,
   store::ProblemStore,
   types::ProblemId,
};

pub async fn execute(config: &Config, ids: Vec<String>, options: OutputOptions) -> Result<()> {
   let store = commands::open_store(config)?;
   let ids: Vec<ProblemId> = ids.into_iter().map(ProblemId::from).collect();

   let problems = store.find_by_ids(&ids).await?;
   if problems.is_empty() && !options.json {
      bail!("no stored problem matches the given ids");
   }

   if problems.len() < ids.len() {
      let missing: Vec<_> = ids
         .iter()
         .filter(|id| !problems.iter().any(|p| &p.id == *id))
         .map(ProblemId::as_str)
         .collect();
      tracing::warn!(?missing, "some ids were not found");
   }

   commands::print_problems(&problems, options)
}
