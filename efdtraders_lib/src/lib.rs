//! Library layer for eFD Traders: turns Senate financial-disclosure search
//! results and filing pages into per-person stock portfolios.
//!
//! Wraps the `efdsearch_api` client with the extraction pipeline: amount
//! and date parsing, report table extraction, row normalization, listing
//! aggregation, and the sequential run controller.

pub mod aggregate;
pub mod amount;
pub mod config;
pub mod error;
pub mod filed_date;
pub mod filing;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod validation;

pub use efdsearch_api;
pub use efdsearch_api::types;
pub use efdsearch_api::{Client, Query, SearchQuery, Session};

pub use aggregate::{IndividualRegistry, IngestStats, RowParser, SearchRow};
pub use amount::parse_amount;
pub use config::Settings;
pub use error::DisclosureError;
pub use filed_date::extract_filed_date;
pub use filing::{extract_transactions, FilingExtractor, FilingFetcher, FilingTransactions};
pub use model::{AmountRange, Individual, IndividualKey, Portfolio, Position, StockTransaction, TxType};
pub use normalize::{normalize_annual_row, normalize_periodic_row};
pub use pipeline::{FilingProgress, PageCursor, PageProgress, Pipeline, RunSummary};
pub use report::{extract_rows, FilingDocument, RawRow, ReportKind};
