use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use efdtraders_lib::store::{self, INDIVIDUALS_PREFIX, PORTFOLIOS_PREFIX};
use efdtraders_lib::{
    FilingProgress, Individual, IndividualRegistry, PageProgress, Pipeline, Portfolio, RunSummary,
};
use indicatif::ProgressBar;

use super::{client, progress_bar, RunArgs};
use crate::output::{
    print_json, print_portfolios_csv, print_portfolios_table, print_summary, OutputFormat,
};

#[derive(Args)]
pub struct PortfoliosArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Resolve a saved individuals file instead of reading the listing
    #[arg(long, conflicts_with = "latest")]
    pub from: Option<PathBuf>,

    /// Resolve the most recent individuals file in --out-dir
    #[arg(long)]
    pub latest: bool,
}

impl PortfoliosArgs {
    /// The saved individuals file to resume from, if one was requested.
    fn saved_individuals(&self) -> Result<Option<PathBuf>> {
        if let Some(ref path) = self.from {
            return Ok(Some(path.clone()));
        }
        if !self.latest {
            return Ok(None);
        }
        match store::latest_output(&self.run.out_dir, INDIVIDUALS_PREFIX)? {
            Some(path) => Ok(Some(path)),
            None => bail!(
                "no {}_<timestamp>.json file in {}",
                INDIVIDUALS_PREFIX,
                self.run.out_dir.display()
            ),
        }
    }
}

pub async fn run(args: &PortfoliosArgs, format: &OutputFormat) -> Result<()> {
    let settings = args.run.settings()?;
    let query = args.run.query(&settings)?;
    let client = client(&settings)?;
    let pipeline = Pipeline::new(&client, query, settings.request_delay)?;

    let (portfolios, summary) = match args.saved_individuals()? {
        Some(path) => resume(&pipeline, &path).await?,
        None => {
            let pb = progress_bar("reading search listing...")?;
            let result = pipeline
                .run(
                    |p: PageProgress| {
                        pb.set_length(p.pages as u64);
                        pb.set_position(p.page as u64);
                    },
                    |f: FilingProgress<'_>| track_filing(&pb, f),
                )
                .await;
            pb.finish_and_clear();
            let (portfolios, summary) = result?;

            let individuals: Vec<Individual> =
                portfolios.iter().map(|p| p.individual.clone()).collect();
            let path = store::write_json(&args.run.out_dir, INDIVIDUALS_PREFIX, &individuals)?;
            eprintln!("Saved {} individuals to {}", individuals.len(), path.display());
            (portfolios, summary)
        }
    };

    let path = store::write_json(&args.run.out_dir, PORTFOLIOS_PREFIX, &portfolios)?;
    print_summary(&summary);
    eprintln!("Saved {} portfolios to {}", portfolios.len(), path.display());

    match format {
        OutputFormat::Table => print_portfolios_table(&portfolios),
        OutputFormat::Json => print_json(&portfolios),
        OutputFormat::Csv => print_portfolios_csv(&portfolios)?,
    }

    Ok(())
}

/// Resolves the filings of a previously saved individuals file.
async fn resume(pipeline: &Pipeline<'_>, path: &Path) -> Result<(Vec<Portfolio>, RunSummary)> {
    let saved: Vec<Individual> = store::read_json(path)?;
    eprintln!("Loaded {} individuals from {}", saved.len(), path.display());
    let individuals = IndividualRegistry::from_individuals(saved).into_individuals();

    let pb = progress_bar("resolving filings...")?;
    let result = pipeline
        .resolve_portfolios(individuals, |f: FilingProgress<'_>| track_filing(&pb, f))
        .await;
    pb.finish_and_clear();
    Ok(result?)
}

fn track_filing(pb: &ProgressBar, f: FilingProgress<'_>) {
    pb.set_length(f.total as u64);
    pb.set_position(f.done as u64);
    pb.set_message(f.individual.full_name());
}
