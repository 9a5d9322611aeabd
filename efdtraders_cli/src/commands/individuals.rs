use anyhow::Result;
use clap::Args;
use efdtraders_lib::store::{self, INDIVIDUALS_PREFIX};
use efdtraders_lib::{IndividualRegistry, PageProgress, Pipeline, RunSummary};

use super::{client, progress_bar, RunArgs};
use crate::output::{
    print_individuals_csv, print_individuals_table, print_json, print_summary, OutputFormat,
};

#[derive(Args)]
pub struct IndividualsArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

/// Pages through the listing with a progress bar and returns the merged
/// filers.
pub async fn collect(pipeline: &Pipeline<'_>) -> Result<(IndividualRegistry, RunSummary)> {
    let pb = progress_bar("reading search listing...")?;
    let result = pipeline
        .collect_individuals(|p: PageProgress| {
            pb.set_length(p.pages as u64);
            pb.set_position(p.page as u64);
        })
        .await;
    pb.finish_and_clear();
    Ok(result?)
}

pub async fn run(args: &IndividualsArgs, format: &OutputFormat) -> Result<()> {
    let settings = args.run.settings()?;
    let query = args.run.query(&settings)?;
    let client = client(&settings)?;
    let pipeline = Pipeline::new(&client, query, settings.request_delay)?;

    let (registry, summary) = collect(&pipeline).await?;
    let individuals = registry.into_individuals();
    let path = store::write_json(&args.run.out_dir, INDIVIDUALS_PREFIX, &individuals)?;

    print_summary(&summary);
    eprintln!("Saved {} individuals to {}", individuals.len(), path.display());

    match format {
        OutputFormat::Table => print_individuals_table(&individuals),
        OutputFormat::Json => print_json(&individuals),
        OutputFormat::Csv => print_individuals_csv(&individuals)?,
    }

    Ok(())
}
