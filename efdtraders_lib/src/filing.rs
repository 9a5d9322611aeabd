//! Fetching a filing and routing it to the extractor for its report kind.

use efdsearch_api::Client;

use crate::error::DisclosureError;
use crate::filed_date::FiledDateExtractor;
use crate::model::StockTransaction;
use crate::normalize::normalize_row;
use crate::report::{FilingDocument, ReportKind};

/// Transactions recovered from one filing.
#[derive(Debug)]
pub struct FilingTransactions {
    pub kind: ReportKind,
    pub filed_date: Option<String>,
    pub transactions: Vec<StockTransaction>,
    /// Rows dropped because their amount could not be parsed.
    pub skipped_rows: usize,
}

/// Turns filing HTML into transactions. Holds compiled patterns so it can
/// be reused across every filing of a run.
pub struct FilingExtractor {
    filed_date: FiledDateExtractor,
}

impl FilingExtractor {
    pub fn new() -> Result<Self, DisclosureError> {
        Ok(Self {
            filed_date: FiledDateExtractor::new()?,
        })
    }

    /// Extracts the transactions of the filing at `link` from its HTML.
    ///
    /// Rows with a malformed amount are logged and skipped; the rest of the
    /// filing is kept.
    pub fn extract(&self, link: &str, html: &str) -> Result<FilingTransactions, DisclosureError> {
        let kind = ReportKind::from_link(link)
            .ok_or_else(|| DisclosureError::UnsupportedReportKind(link.to_string()))?;

        let document = FilingDocument::parse(html);
        let filed_date = self.filed_date.extract(&document.page_text());
        let rows = document.rows(kind)?;

        let mut transactions = Vec::new();
        let mut skipped_rows = 0;
        for row in &rows {
            match normalize_row(kind, row, filed_date.as_deref()) {
                Ok(mut txs) => transactions.append(&mut txs),
                Err(e @ DisclosureError::MalformedAmount(_)) => {
                    tracing::warn!("Skipping row in {}: {}", link, e);
                    skipped_rows += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(
            "{} ({}): {} rows, {} transactions",
            link,
            kind,
            rows.len(),
            transactions.len()
        );

        Ok(FilingTransactions {
            kind,
            filed_date,
            transactions,
            skipped_rows,
        })
    }
}

/// One-shot form of [`FilingExtractor::extract`].
pub fn extract_transactions(link: &str, html: &str) -> Result<FilingTransactions, DisclosureError> {
    FilingExtractor::new()?.extract(link, html)
}

/// Fetches filings through the portal client and extracts them.
pub struct FilingFetcher<'a> {
    client: &'a Client,
    extractor: FilingExtractor,
}

impl<'a> FilingFetcher<'a> {
    pub fn new(client: &'a Client) -> Result<Self, DisclosureError> {
        Ok(Self {
            client,
            extractor: FilingExtractor::new()?,
        })
    }

    /// Fetches and extracts one filing. Links of an unsupported kind fail
    /// before any request is made.
    pub async fn fetch(&self, link: &str) -> Result<FilingTransactions, DisclosureError> {
        if ReportKind::from_link(link).is_none() {
            return Err(DisclosureError::UnsupportedReportKind(link.to_string()));
        }
        let html = self.client.get_filing(link).await?;
        self.extractor.extract(link, &html)
    }
}
