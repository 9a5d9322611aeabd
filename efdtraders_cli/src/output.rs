use anyhow::Result;
use efdtraders_lib::{AmountRange, Individual, Portfolio, RunSummary, StockTransaction, TxType};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct IndividualRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Position")]
    #[serde(rename = "Position")]
    position: String,
    #[tabled(rename = "Filings")]
    #[serde(rename = "Filings")]
    filings: usize,
}

#[derive(Tabled, Serialize)]
struct PortfolioRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Position")]
    #[serde(rename = "Position")]
    position: String,
    #[tabled(rename = "Filings")]
    #[serde(rename = "Filings")]
    filings: usize,
    #[tabled(rename = "Transactions")]
    #[serde(rename = "Transactions")]
    transactions: usize,
    #[tabled(rename = "Buys")]
    #[serde(rename = "Buys")]
    buys: usize,
    #[tabled(rename = "Sells")]
    #[serde(rename = "Sells")]
    sells: usize,
}

#[derive(Tabled, Serialize)]
struct TransactionRow {
    #[tabled(rename = "Filed")]
    #[serde(rename = "Filed")]
    filed: String,
    #[tabled(rename = "Traded")]
    #[serde(rename = "Traded")]
    traded: String,
    #[tabled(rename = "Owner")]
    #[serde(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Ticker")]
    #[serde(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Asset")]
    #[serde(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    tx_type: String,
    #[tabled(rename = "Amount")]
    #[serde(rename = "Amount")]
    amount: String,
}

/// One transaction per row, tagged with its filer. Used for CSV export of
/// a whole run.
#[derive(Serialize)]
struct HoldingRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Filed")]
    filed: String,
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Asset")]
    asset: String,
    #[serde(rename = "Asset Type")]
    asset_type: String,
    #[serde(rename = "Type")]
    tx_type: String,
    #[serde(rename = "Low")]
    low: u64,
    #[serde(rename = "High")]
    high: u64,
}

// -- Row builders --

fn build_individual_rows(individuals: &[Individual]) -> Vec<IndividualRow> {
    individuals
        .iter()
        .map(|i| IndividualRow {
            name: i.full_name(),
            position: i.position.to_string(),
            filings: i.links.len(),
        })
        .collect()
}

fn build_portfolio_rows(portfolios: &[Portfolio]) -> Vec<PortfolioRow> {
    portfolios
        .iter()
        .map(|p| PortfolioRow {
            name: p.individual.full_name(),
            position: p.individual.position.to_string(),
            filings: p.individual.links.len(),
            transactions: p.stocks.len(),
            buys: count_type(&p.stocks, TxType::Buy),
            sells: count_type(&p.stocks, TxType::Sell),
        })
        .collect()
}

fn build_transaction_rows(stocks: &[StockTransaction]) -> Vec<TransactionRow> {
    stocks
        .iter()
        .map(|s| TransactionRow {
            filed: s.filed_date.clone().unwrap_or_default(),
            traded: s.transaction_date.clone().unwrap_or_default(),
            owner: s.owner.clone().unwrap_or_default(),
            ticker: s.ticker.clone().unwrap_or_default(),
            asset: s.asset_name.clone(),
            tx_type: s.transaction_type.to_string(),
            amount: format_amount(s.amount_range),
        })
        .collect()
}

fn build_holding_rows(portfolios: &[Portfolio]) -> Vec<HoldingRow> {
    portfolios
        .iter()
        .flat_map(|p| {
            p.stocks.iter().map(move |s| HoldingRow {
                name: p.individual.full_name(),
                position: p.individual.position.to_string(),
                filed: s.filed_date.clone().unwrap_or_default(),
                ticker: s.ticker.clone().unwrap_or_default(),
                asset: s.asset_name.clone(),
                asset_type: s.asset_type.clone(),
                tx_type: s.transaction_type.to_string(),
                low: s.amount_range.low(),
                high: s.amount_range.high(),
            })
        })
        .collect()
}

fn count_type(stocks: &[StockTransaction], tx_type: TxType) -> usize {
    stocks
        .iter()
        .filter(|s| s.transaction_type == tx_type)
        .count()
}

// -- Table output --

pub fn print_individuals_table(individuals: &[Individual]) {
    println!("{}", Table::new(build_individual_rows(individuals)));
}

pub fn print_portfolios_table(portfolios: &[Portfolio]) {
    println!("{}", Table::new(build_portfolio_rows(portfolios)));
}

pub fn print_transactions_table(stocks: &[StockTransaction]) {
    println!("{}", Table::new(build_transaction_rows(stocks)));
}

// -- CSV output --

fn write_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_individuals_csv(individuals: &[Individual]) -> Result<()> {
    write_csv(&build_individual_rows(individuals))
}

pub fn print_portfolios_csv(portfolios: &[Portfolio]) -> Result<()> {
    write_csv(&build_holding_rows(portfolios))
}

pub fn print_transactions_csv(stocks: &[StockTransaction]) -> Result<()> {
    write_csv(&build_transaction_rows(stocks))
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Run summary --

pub fn print_summary(summary: &RunSummary) {
    eprintln!(
        "{} listed, {} pages ({} failed), {} individuals, {} paper filings skipped",
        summary.records_total,
        summary.pages_fetched + summary.pages_failed,
        summary.pages_failed,
        summary.individuals,
        summary.paper_skipped
    );
    if summary.filings_ok + summary.filings_failed > 0 {
        eprintln!(
            "{} filings resolved ({} failed), {} transactions, {} rows skipped",
            summary.filings_ok, summary.filings_failed, summary.transactions, summary.rows_skipped
        );
    }
}

fn format_amount(range: AmountRange) -> String {
    if range == AmountRange(0, 0) {
        return "None".to_string();
    }
    format!(
        "${} - ${}",
        group_thousands(range.low()),
        group_thousands(range.high())
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use efdtraders_lib::Position;
    use tabled::settings::Style;

    fn tx(ticker: Option<&str>, tx_type: TxType, amount: AmountRange) -> StockTransaction {
        StockTransaction {
            asset_name: "Apple Inc.".into(),
            transaction_type: tx_type,
            amount_range: amount,
            filed_date: Some("01/16/2020".into()),
            transaction_date: Some("01/02/2020".into()),
            option_detail: None,
            ticker: ticker.map(str::to_string),
            owner: Some("Self".into()),
            asset_type: "Stock".into(),
            comment: None,
        }
    }

    fn sample_portfolios() -> Vec<Portfolio> {
        vec![
            Portfolio {
                individual: Individual {
                    first_name: "John".into(),
                    last_name: "Doe".into(),
                    position: Position::Senator,
                    links: vec!["/search/view/ptr/a/".into(), "/search/view/ptr/b/".into()],
                },
                stocks: vec![
                    tx(Some("AAPL"), TxType::Buy, AmountRange(1001, 15000)),
                    tx(Some("MSFT"), TxType::Sell, AmountRange(15001, 50000)),
                    tx(Some("GOOGL"), TxType::Buy, AmountRange(1001, 15000)),
                ],
            },
            Portfolio::new(Individual {
                first_name: "Jane".into(),
                last_name: "Roe".into(),
                position: Position::Unknown,
                links: vec![],
            }),
        ]
    }

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("CSV"), OutputFormat::Csv);
        assert_eq!(OutputFormat::parse("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("xml"), OutputFormat::Table);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1001), "1,001");
        assert_eq!(group_thousands(50_000_000), "50,000,000");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(AmountRange(1001, 15000)), "$1,001 - $15,000");
        assert_eq!(format_amount(AmountRange(0, 0)), "None");
    }

    #[test]
    fn test_build_portfolio_rows_counts() {
        let rows = build_portfolio_rows(&sample_portfolios());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "John Doe");
        assert_eq!(rows[0].position, "Senator");
        assert_eq!(rows[0].filings, 2);
        assert_eq!(rows[0].transactions, 3);
        assert_eq!(rows[0].buys, 2);
        assert_eq!(rows[0].sells, 1);
        assert_eq!(rows[1].position, "N/A");
        assert_eq!(rows[1].transactions, 0);
    }

    #[test]
    fn test_build_transaction_rows_missing_ticker() {
        let mut holding = tx(None, TxType::Sell, AmountRange(0, 0));
        holding.transaction_date = None;
        holding.owner = None;
        let rows = build_transaction_rows(&[holding]);
        assert_eq!(rows[0].ticker, "");
        assert_eq!(rows[0].traded, "");
        assert_eq!(rows[0].amount, "None");
        assert_eq!(rows[0].tx_type, "sell");
    }

    #[test]
    fn test_holding_rows_flatten_portfolios() {
        let rows = build_holding_rows(&sample_portfolios());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.name == "John Doe"));
        assert_eq!(rows[1].ticker, "MSFT");
        assert_eq!(rows[1].low, 15001);
        assert_eq!(rows[1].high, 50000);
    }

    #[test]
    fn test_csv_holdings_headers() {
        let csv = csv_from_rows(&build_holding_rows(&sample_portfolios()));
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "Name,Position,Filed,Ticker,Asset,Asset Type,Type,Low,High");
    }

    #[test]
    fn test_csv_individuals_headers() {
        let individuals: Vec<Individual> = sample_portfolios()
            .into_iter()
            .map(|p| p.individual)
            .collect();
        let csv = csv_from_rows(&build_individual_rows(&individuals));
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Name,Position,Filings");
        assert_eq!(lines.next().unwrap(), "John Doe,Senator,2");
    }

    #[test]
    fn test_table_contains_headers() {
        let mut table = Table::new(build_transaction_rows(&sample_portfolios()[0].stocks));
        table.with(Style::markdown());
        let md = table.to_string();
        let header = md.lines().next().unwrap();
        assert!(header.contains("Ticker"));
        assert!(header.contains("Amount"));
        assert!(md.contains("$1,001 - $15,000"));
    }
}
