//! Records produced by the pipeline: individuals, their transactions, and
//! the finished portfolios written to disk.

use serde::{Deserialize, Serialize};

/// Office label recovered from the listing's free-text position column.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    #[serde(rename = "Senator")]
    Senator,
    #[serde(rename = "Candidate")]
    Candidate,
    #[serde(rename = "N/A")]
    Unknown,
}
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Position::Senator => "Senator",
                Position::Candidate => "Candidate",
                Position::Unknown => "N/A",
            }
        )
    }
}

/// A filer seen in the search listing, with every filing link found for them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Individual {
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Identity of an [`Individual`]: normalized first and last name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndividualKey {
    pub first_name: String,
    pub last_name: String,
}

impl Individual {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Disclosed dollar bracket, serialized as `[low, high]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountRange(pub u64, pub u64);

impl AmountRange {
    pub fn low(&self) -> u64 {
        self.0
    }

    pub fn high(&self) -> u64 {
        self.1
    }
}

/// Direction of a transaction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Buy,
    Sell,
    Exchange,
    Unknown,
}
impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TxType::Buy => "buy",
                TxType::Sell => "sell",
                TxType::Exchange => "exchange",
                TxType::Unknown => "unknown",
            }
        )
    }
}

impl TxType {
    /// Maps the periodic report's "Type" column: `Purchase`, `Sale (Full)`,
    /// `Sale (Partial)`, `Exchange`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        if label.starts_with("purchase") {
            TxType::Buy
        } else if label.starts_with("sale") {
            TxType::Sell
        } else if label.starts_with("exchange") {
            TxType::Exchange
        } else {
            TxType::Unknown
        }
    }
}

/// One normalized transaction (or annual holding) from a filing.
///
/// Field names on the wire follow the published output schema: `name`,
/// `type`, `amount`, `date`, `transaction_date`, `options`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StockTransaction {
    #[serde(rename = "name")]
    pub asset_name: String,

    #[serde(rename = "type")]
    pub transaction_type: TxType,

    #[serde(rename = "amount")]
    pub amount_range: AmountRange,

    /// Date the filing was submitted (`MM/DD/YYYY`), when the page shows it.
    #[serde(rename = "date")]
    pub filed_date: Option<String>,

    /// Only periodic reports carry a per-transaction date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,

    #[serde(rename = "options", default, skip_serializing_if = "Option::is_none")]
    pub option_detail: Option<String>,

    /// Absent for annual holdings, which list no ticker column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,

    /// Self, Spouse, Joint, Child. Periodic reports only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    pub asset_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// An [`Individual`] with every transaction from all of their filings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Portfolio {
    #[serde(flatten)]
    pub individual: Individual,
    #[serde(default)]
    pub stocks: Vec<StockTransaction>,
}

impl Portfolio {
    pub fn new(individual: Individual) -> Self {
        Self {
            individual,
            stocks: Vec::new(),
        }
    }
}
