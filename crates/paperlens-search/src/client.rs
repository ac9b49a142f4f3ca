//! Paged arXiv search: validate, build the query, fetch pages through a
//! [`Transport`], map Atom entries into [`Paper`] values.

use anyhow::{anyhow, bail, Result as AnyResult};
use chrono::{DateTime, Utc};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use paperlens_core::config::SearchSettings;
use paperlens_core::types::MAX_RESULT_CAP;
use paperlens_core::{Error, Paper, Result, SearchParams, SortMode, Taxonomy};

use crate::atom::{parse_feed, Feed, RawEntry};
use crate::query::{build_query, Query};
use crate::transport::{FeedRequest, Transport};

/// arXiv asks clients to wait three seconds between calls.
const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingOptions {
    pub page_size: usize,
    pub page_delay: Duration,
    pub retries: usize,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self { page_size: 100, page_delay: DEFAULT_PAGE_DELAY, retries: 3 }
    }
}

impl PagingOptions {
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            page_size: settings.page_size.max(1),
            page_delay: Duration::from_millis(settings.page_delay_ms),
            retries: settings.retries,
        }
    }
}

pub struct ArxivClient<T: Transport> {
    transport: T,
    paging: PagingOptions,
    taxonomy: &'static Taxonomy,
}

impl<T: Transport> ArxivClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport, paging: PagingOptions::default(), taxonomy: Taxonomy::arxiv() }
    }

    pub fn with_paging(mut self, paging: PagingOptions) -> Self {
        self.paging = paging;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `params`, run the search and return up to `max_results` papers
    /// in upstream order.
    ///
    /// Validation errors come back as-is. Any upstream failure is logged with
    /// its cause and surfaced as [`Error::SearchFailed`].
    pub fn search(&self, params: &SearchParams) -> Result<Vec<Paper>> {
        let query = build_query(
            &params.keywords,
            &params.category,
            params.start_date,
            params.end_date,
            self.taxonomy,
        )?;

        info!(keywords = ?params.keywords, "Keywords");
        info!(start = %params.start_date, end = %params.end_date, "Date range");
        info!(query = %query, sort = %params.sort_by, "Query");

        let cap = params.max_results.clamp(1, MAX_RESULT_CAP);
        match self.run(&query, params.sort_by, cap) {
            Ok(papers) => {
                info!(count = papers.len(), "search finished");
                Ok(papers)
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "Error getting results");
                Err(Error::SearchFailed)
            }
        }
    }

    /// Fetch pages until `cap` papers are collected or upstream runs dry.
    fn run(&self, query: &Query, sort: SortMode, cap: usize) -> AnyResult<Vec<Paper>> {
        let rendered = query.render();
        let mut papers = Vec::with_capacity(cap.min(self.paging.page_size));
        let mut offset = 0usize;

        loop {
            let want = (cap - papers.len()).min(self.paging.page_size.max(1));
            if offset > 0 {
                thread::sleep(self.paging.page_delay);
            }
            let request = FeedRequest { query: rendered.clone(), start: offset, max_results: want, sort };
            let feed = self.fetch_page(&request)?;

            let received = feed.entries.len();
            let total = feed.total_results;
            debug!(offset, received, ?total, "page fetched");

            for entry in feed.entries {
                if papers.len() >= cap {
                    break;
                }
                if let Some(paper) = self.to_paper(entry) {
                    papers.push(paper);
                }
            }

            offset += received;
            let exhausted = match total {
                Some(total) => offset >= total,
                None => received < want,
            };
            if received == 0 || exhausted || papers.len() >= cap {
                break;
            }
        }
        Ok(papers)
    }

    /// One page with bounded retries on transport and parse failures. An
    /// error feed is a rejected query and fails without retrying.
    fn fetch_page(&self, request: &FeedRequest) -> AnyResult<Feed> {
        let attempts = self.paging.retries + 1;
        let mut last_err = anyhow!("no attempt made");
        for attempt in 1..=attempts {
            match self.try_page(request) {
                Ok(feed) => {
                    if let Some(err) = feed.error() {
                        bail!("arXiv rejected the query: {}", err.summary);
                    }
                    return Ok(feed);
                }
                Err(e) => {
                    warn!(attempt, attempts, start = request.start, error = %e, "page fetch failed");
                    last_err = e;
                    if attempt < attempts {
                        thread::sleep(self.paging.page_delay);
                    }
                }
            }
        }
        Err(last_err)
    }

    fn try_page(&self, request: &FeedRequest) -> AnyResult<Feed> {
        let body = self.transport.fetch(request)?;
        parse_feed(&body)
    }

    fn to_paper(&self, entry: RawEntry) -> Option<Paper> {
        let id = entry.short_id().to_string();
        let published = match parse_timestamp(&entry.published) {
            Some(ts) => ts,
            None => {
                warn!(id = %id, published = %entry.published, "skipping entry with unreadable publish date");
                return None;
            }
        };
        let updated = parse_timestamp(&entry.updated).unwrap_or(published);

        let mut codes = entry.categories.clone();
        if codes.is_empty() {
            codes.extend(entry.primary_category.clone());
        }
        let Some(first) = codes.first().cloned() else {
            warn!(id = %id, "skipping entry without categories");
            return None;
        };
        let primary = entry.primary_category.clone().unwrap_or(first);

        Some(Paper {
            pdf_link: entry.pdf_link(),
            link: entry.id.clone(),
            id,
            title: entry.title,
            authors: entry.authors,
            abstract_text: entry.summary,
            published,
            updated,
            primary_category: self.display(&primary),
            categories: codes.iter().map(|c| self.display(c)).collect(),
        })
    }

    fn display(&self, code: &str) -> String {
        self.taxonomy.display_name(code).unwrap_or(code).to_string()
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok().map(|ts| ts.with_timezone(&Utc))
}
