mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "efdtraders")]
#[command(about = "Scrape Senate financial disclosures into per-person stock portfolios")]
struct Cli {
    /// Output format: table, json or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through the search listing and save every filer with their links
    Individuals(commands::individuals::IndividualsArgs),
    /// Resolve filings into portfolios (full run, or from a saved individuals file)
    Portfolios(commands::portfolios::PortfoliosArgs),
    /// Fetch a single filing and print its transactions
    Filing(commands::filing::FilingArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("efdtraders=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Individuals(args) => commands::individuals::run(args, &format).await?,
        Commands::Portfolios(args) => commands::portfolios::run(args, &format).await?,
        Commands::Filing(args) => commands::filing::run(args, &format).await?,
    }

    Ok(())
}
