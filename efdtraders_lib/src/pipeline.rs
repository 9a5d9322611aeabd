//! Drives a full run: paginate the listing, aggregate individuals, then
//! resolve every filing link into transactions.
//!
//! Everything is sequential: one page at a time, then one filing at a time,
//! with a settle delay between requests. Only an authentication failure
//! stops the run; any other failure costs the page or filing it happened on.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use efdsearch_api::{Client, Query, SearchQuery};
use rand::Rng;

use crate::aggregate::{IndividualRegistry, IngestStats, RowParser};
use crate::error::DisclosureError;
use crate::filing::FilingFetcher;
use crate::model::{Individual, Portfolio};
use crate::report::ReportKind;

/// Offsets of the listing pages still to fetch: `start, start + step, ..`
/// up to (excluding) `stop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    pub start: i64,
    pub step: i64,
    pub stop: i64,
}

impl PageCursor {
    /// Cursor over all pages of a listing with `total` rows.
    pub fn new(total: i64, page_size: i64) -> Self {
        Self {
            start: 0,
            step: page_size.max(1),
            stop: total.max(0),
        }
    }

    pub fn offsets(&self) -> impl Iterator<Item = i64> {
        (self.start..self.stop).step_by(self.step as usize)
    }

    pub fn page_count(&self) -> usize {
        if self.stop <= self.start {
            return 0;
        }
        ((self.stop - self.start + self.step - 1) / self.step) as usize
    }
}

/// Reported after each listing page.
#[derive(Clone, Copy, Debug)]
pub struct PageProgress {
    /// 1-based page number.
    pub page: usize,
    pub pages: usize,
    /// `None` when the page could not be fetched.
    pub stats: Option<IngestStats>,
}

/// Reported after each filing.
#[derive(Clone, Debug)]
pub struct FilingProgress<'a> {
    pub done: usize,
    pub total: usize,
    pub individual: &'a Individual,
    pub link: &'a str,
    /// Transactions recovered; `None` when the filing failed.
    pub transactions: Option<usize>,
}

/// Counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records_total: i64,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub individuals: usize,
    pub paper_skipped: usize,
    pub filings_ok: usize,
    pub filings_failed: usize,
    pub transactions: usize,
    pub rows_skipped: usize,
}

impl RunSummary {
    /// Folds the counters of a later phase into this one.
    pub fn merge(&mut self, other: RunSummary) {
        self.records_total = self.records_total.max(other.records_total);
        self.pages_fetched += other.pages_fetched;
        self.pages_failed += other.pages_failed;
        self.individuals = self.individuals.max(other.individuals);
        self.paper_skipped += other.paper_skipped;
        self.filings_ok += other.filings_ok;
        self.filings_failed += other.filings_failed;
        self.transactions += other.transactions;
        self.rows_skipped += other.rows_skipped;
    }
}

/// Sequential pipeline over one portal client.
pub struct Pipeline<'a> {
    client: &'a Client,
    query: SearchQuery,
    request_delay: Duration,
    parser: RowParser,
    fetcher: FilingFetcher<'a>,
    /// When the last request was sent, for the settle delay.
    last_request: Mutex<Option<Instant>>,
}

impl<'a> Pipeline<'a> {
    /// `query` carries the filters and page size; its start offset is
    /// managed by the pipeline.
    pub fn new(
        client: &'a Client,
        query: SearchQuery,
        request_delay: Duration,
    ) -> Result<Self, DisclosureError> {
        Ok(Self {
            client,
            query,
            request_delay,
            parser: RowParser::new()?,
            fetcher: FilingFetcher::new(client)?,
            last_request: Mutex::new(None),
        })
    }

    async fn settle(&self) {
        let sleep_dur = {
            let last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
            match *last {
                Some(last_time) if !self.request_delay.is_zero() => {
                    let jitter = rand::thread_rng().gen_range(0.8..1.2);
                    let delay = self.request_delay.mul_f64(jitter);
                    delay.checked_sub(last_time.elapsed())
                }
                _ => None,
            }
        };
        if let Some(dur) = sleep_dur {
            tokio::time::sleep(dur).await;
        }
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }

    fn page_query(&self, start: i64, draw: i64) -> SearchQuery {
        self.query.clone().with_start(start).with_draw(draw)
    }

    /// Walks every page of the listing and aggregates its rows.
    ///
    /// The first page supplies `recordsTotal`, from which the remaining
    /// offsets are derived. A failed page is logged and skipped.
    pub async fn collect_individuals<F>(
        &self,
        mut on_page: F,
    ) -> Result<(IndividualRegistry, RunSummary), DisclosureError>
    where
        F: FnMut(PageProgress),
    {
        let mut registry = IndividualRegistry::new();
        let mut summary = RunSummary::default();

        self.settle().await;
        let first = match self.client.search_reports(&self.page_query(0, 1)).await {
            Ok(resp) => resp,
            Err(e) => {
                let err = DisclosureError::from(e);
                if err.is_fatal() {
                    return Err(err);
                }
                tracing::error!("First search page failed, nothing to aggregate: {}", err);
                summary.pages_failed += 1;
                on_page(PageProgress {
                    page: 1,
                    pages: 1,
                    stats: None,
                });
                return Ok((registry, summary));
            }
        };

        let cursor = PageCursor::new(first.records_total, self.query.common.length);
        let pages = cursor.page_count().max(1);
        summary.records_total = first.records_total;
        tracing::info!(
            "{} filings listed across {} pages",
            first.records_total,
            pages
        );

        let stats = registry.ingest_page(&self.parser, &first.data);
        summary.pages_fetched += 1;
        summary.paper_skipped += stats.paper;
        on_page(PageProgress {
            page: 1,
            pages,
            stats: Some(stats),
        });

        for (i, start) in cursor.offsets().enumerate().skip(1) {
            let page = i + 1;
            self.settle().await;
            match self
                .client
                .search_reports(&self.page_query(start, page as i64))
                .await
            {
                Ok(resp) => {
                    let stats = registry.ingest_page(&self.parser, &resp.data);
                    summary.pages_fetched += 1;
                    summary.paper_skipped += stats.paper;
                    on_page(PageProgress {
                        page,
                        pages,
                        stats: Some(stats),
                    });
                }
                Err(e) => {
                    let err = DisclosureError::from(e);
                    if err.is_fatal() {
                        return Err(err);
                    }
                    tracing::warn!("Search page {} (offset {}) failed: {}", page, start, err);
                    summary.pages_failed += 1;
                    on_page(PageProgress {
                        page,
                        pages,
                        stats: None,
                    });
                }
            }
        }

        summary.individuals = registry.len();
        Ok((registry, summary))
    }

    /// Fetches every link of every individual, in order, and builds their
    /// portfolios.
    pub async fn resolve_portfolios<F>(
        &self,
        individuals: Vec<Individual>,
        mut on_filing: F,
    ) -> Result<(Vec<Portfolio>, RunSummary), DisclosureError>
    where
        F: FnMut(FilingProgress<'_>),
    {
        let total: usize = individuals.iter().map(|i| i.links.len()).sum();
        let mut summary = RunSummary {
            individuals: individuals.len(),
            ..RunSummary::default()
        };
        let mut portfolios = Vec::with_capacity(individuals.len());
        let mut done = 0;

        for individual in individuals {
            let mut stocks = Vec::new();
            for link in &individual.links {
                done += 1;
                let outcome = if ReportKind::from_link(link).is_some() {
                    self.settle().await;
                    self.fetcher.fetch(link).await
                } else {
                    Err(DisclosureError::UnsupportedReportKind(link.clone()))
                };

                let recovered = match outcome {
                    Ok(filing) => {
                        summary.filings_ok += 1;
                        summary.rows_skipped += filing.skipped_rows;
                        let count = filing.transactions.len();
                        stocks.extend(filing.transactions);
                        Some(count)
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            "No transactions from {} for {}: {}",
                            link,
                            individual.full_name(),
                            e
                        );
                        summary.filings_failed += 1;
                        None
                    }
                };

                on_filing(FilingProgress {
                    done,
                    total,
                    individual: &individual,
                    link,
                    transactions: recovered,
                });
            }

            summary.transactions += stocks.len();
            portfolios.push(Portfolio { individual, stocks });
        }

        Ok((portfolios, summary))
    }

    /// Runs both phases and returns the finished portfolios.
    pub async fn run<P, F>(
        &self,
        on_page: P,
        on_filing: F,
    ) -> Result<(Vec<Portfolio>, RunSummary), DisclosureError>
    where
        P: FnMut(PageProgress),
        F: FnMut(FilingProgress<'_>),
    {
        let (registry, mut summary) = self.collect_individuals(on_page).await?;
        let (portfolios, resolved) = self
            .resolve_portfolios(registry.into_individuals(), on_filing)
            .await?;
        summary.merge(resolved);
        Ok((portfolios, summary))
    }
}
