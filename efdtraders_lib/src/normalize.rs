//! Turning raw table rows into [`StockTransaction`] records.

use crate::amount::parse_amount;
use crate::error::DisclosureError;
use crate::model::{AmountRange, StockTransaction, TxType};
use crate::report::ReportKind;

/// Placeholder the portal prints in empty ticker and comment cells.
pub const PLACEHOLDER: &str = "--";

/// Column layout of a periodic transaction report row.
mod ptr_col {
    pub const TRANSACTION_DATE: usize = 1;
    pub const OWNER: usize = 2;
    pub const TICKER: usize = 3;
    pub const ASSET_NAME: usize = 4;
    pub const ASSET_TYPE: usize = 5;
    pub const TYPE: usize = 6;
    pub const AMOUNT: usize = 7;
    pub const COMMENT: usize = 8;
    /// The comment column is optional.
    pub const REQUIRED: usize = 8;
}

/// Column layout of an annual report assets row.
mod annual_col {
    pub const ASSET_NAME: usize = 1;
    pub const ASSET_TYPE: usize = 2;
    pub const VALUE: usize = 4;
    pub const REQUIRED: usize = 5;
}

/// Normalizes one row of either report kind.
pub fn normalize_row(
    kind: ReportKind,
    row: &[String],
    filed_date: Option<&str>,
) -> Result<Vec<StockTransaction>, DisclosureError> {
    match kind {
        ReportKind::Periodic => normalize_periodic_row(row, filed_date),
        ReportKind::Annual => Ok(normalize_annual_row(row, filed_date)?
            .into_iter()
            .collect()),
    }
}

/// Normalizes a periodic transaction report row into zero or more
/// transactions, one per co-reported ticker.
///
/// Rows that are too short, carry the `--` ticker placeholder, are not a
/// stock, or whose tickers cannot be paired with asset names yield nothing.
/// An unparseable amount is returned as [`DisclosureError::MalformedAmount`]
/// so the caller can drop just this row.
pub fn normalize_periodic_row(
    row: &[String],
    filed_date: Option<&str>,
) -> Result<Vec<StockTransaction>, DisclosureError> {
    if row.len() < ptr_col::REQUIRED {
        tracing::debug!("Skipping short transaction row ({} columns)", row.len());
        return Ok(Vec::new());
    }

    let ticker_text = row[ptr_col::TICKER].trim();
    if ticker_text.is_empty() || ticker_text == PLACEHOLDER {
        return Ok(Vec::new());
    }

    let asset_type = flatten(&row[ptr_col::ASSET_TYPE]);
    if !asset_type.contains("Stock") {
        return Ok(Vec::new());
    }

    let amount = parse_amount(&row[ptr_col::AMOUNT])?;

    let tickers: Vec<&str> = ticker_text.split_whitespace().collect();
    let Some(names) = pair_asset_names(&tickers, &row[ptr_col::ASSET_NAME]) else {
        tracing::warn!(
            "Skipping row: {} tickers ({}) do not line up with asset names {:?}",
            tickers.len(),
            ticker_text,
            row[ptr_col::ASSET_NAME]
        );
        return Ok(Vec::new());
    };

    let comment = row
        .get(ptr_col::COMMENT)
        .map(|c| flatten(c))
        .filter(|c| !c.is_empty() && c != PLACEHOLDER);
    let comments = attribute_comment(&tickers, comment.as_deref());

    let transaction_date = optional_cell(&row[ptr_col::TRANSACTION_DATE]);
    let owner = optional_cell(&row[ptr_col::OWNER]);
    let transaction_type = TxType::from_label(&row[ptr_col::TYPE]);
    let is_option = asset_type.contains("Option");

    Ok(tickers
        .iter()
        .zip(names)
        .zip(comments)
        .map(|((ticker, name), comment)| {
            let (asset_name, option_detail) = if is_option {
                split_option(&name)
            } else {
                (name, None)
            };
            StockTransaction {
                asset_name,
                transaction_type,
                amount_range: amount,
                filed_date: filed_date.map(str::to_string),
                transaction_date: transaction_date.clone(),
                option_detail,
                ticker: Some(ticker.to_string()),
                owner: owner.clone(),
                asset_type: asset_type.clone(),
                comment,
            }
        })
        .collect())
}

/// Normalizes an annual report assets row.
///
/// Only mutual funds and corporate securities are kept. A value reading
/// `None` marks a position that was sold off during the year.
pub fn normalize_annual_row(
    row: &[String],
    filed_date: Option<&str>,
) -> Result<Option<StockTransaction>, DisclosureError> {
    if row.len() < annual_col::REQUIRED {
        tracing::debug!("Skipping short asset row ({} columns)", row.len());
        return Ok(None);
    }

    let asset_type = flatten(&row[annual_col::ASSET_TYPE]);
    if !(asset_type.contains("Mutual Funds") || asset_type.contains("Corporate Securities")) {
        return Ok(None);
    }

    let value = flatten(&row[annual_col::VALUE]);
    let (transaction_type, amount_range) = if value.contains("None") {
        (TxType::Sell, AmountRange(0, 0))
    } else {
        (TxType::Buy, parse_amount(&value)?)
    };

    Ok(Some(StockTransaction {
        asset_name: flatten(&row[annual_col::ASSET_NAME]),
        transaction_type,
        amount_range,
        filed_date: filed_date.map(str::to_string),
        transaction_date: None,
        option_detail: None,
        ticker: None,
        owner: None,
        asset_type,
        comment: None,
    }))
}

/// Splits a multi-asset name cell into its blank-line separated segments.
fn asset_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                segments.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }
    segments
}

/// Returns one asset name per ticker, or `None` when the cell cannot be
/// paired positionally with the tickers.
fn pair_asset_names(tickers: &[&str], asset_text: &str) -> Option<Vec<String>> {
    let segments = asset_segments(asset_text);
    match (tickers.len(), segments.len()) {
        (1, _) => Some(vec![segments.join(" ")]),
        (n, m) if n == m => Some(segments),
        _ => None,
    }
}

/// Decides which tickers a row comment belongs to: the tickers it names,
/// or every ticker when it names none of them.
fn attribute_comment(tickers: &[&str], comment: Option<&str>) -> Vec<Option<String>> {
    let Some(comment) = comment else {
        return vec![None; tickers.len()];
    };
    let named: Vec<bool> = tickers.iter().map(|t| comment.contains(t)).collect();
    let any_named = named.iter().any(|n| *n);
    named
        .into_iter()
        .map(|is_named| (is_named || !any_named).then(|| comment.to_string()))
        .collect()
}

/// Splits `"Tesla Inc. Option Type: Call ..."` into the asset name and the
/// option clause starting at the first `Option`.
fn split_option(name: &str) -> (String, Option<String>) {
    match name.find("Option") {
        Some(idx) => (
            name[..idx].trim().to_string(),
            Some(name[idx..].trim().to_string()),
        ),
        None => (name.to_string(), None),
    }
}

fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn optional_cell(text: &str) -> Option<String> {
    let text = flatten(text);
    (!text.is_empty() && text != PLACEHOLDER).then_some(text)
}
