use anyhow::Result;
use clap::Args;
use efdtraders_lib::{FilingFetcher, Settings};

use super::client;
use crate::output::{print_json, print_transactions_csv, print_transactions_table, OutputFormat};

#[derive(Args)]
pub struct FilingArgs {
    /// Filing link from the listing, e.g. /search/view/ptr/<id>/
    pub link: String,
}

pub async fn run(args: &FilingArgs, format: &OutputFormat) -> Result<()> {
    let settings = Settings::from_env()?;
    let client = client(&settings)?;
    let fetcher = FilingFetcher::new(&client)?;

    let filing = fetcher.fetch(args.link.trim()).await?;
    eprintln!(
        "{} report filed {}: {} transactions ({} rows skipped)",
        filing.kind,
        filing.filed_date.as_deref().unwrap_or("on an unknown date"),
        filing.transactions.len(),
        filing.skipped_rows
    );

    match format {
        OutputFormat::Table => print_transactions_table(&filing.transactions),
        OutputFormat::Json => print_json(&filing.transactions),
        OutputFormat::Csv => print_transactions_csv(&filing.transactions)?,
    }

    Ok(())
}
