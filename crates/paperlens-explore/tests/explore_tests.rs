use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use chrono::NaiveDate;
use paperlens_core::config::Settings;
use paperlens_core::{Error, SearchParams, SortMode};
use paperlens_explore::Explorer;
use paperlens_search::{ArxivClient, FeedRequest, PagingOptions, Transport};

fn fixture(name: &str) -> String {
    // crates/paperlens-explore -> crates -> repo root
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).expect("repo root").to_path_buf();
    std::fs::read_to_string(root.join("test_data/arxiv").join(name)).expect("fixture")
}

/// Serves the fixture feed, failing the first `fail_first` calls.
struct CountingTransport {
    calls: AtomicUsize,
    fail_first: usize,
}

impl CountingTransport {
    fn new(fail_first: usize) -> Self {
        Self { calls: AtomicUsize::new(0), fail_first }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn fetch(&self, _request: &FeedRequest) -> anyhow::Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            return Err(anyhow!("upstream unavailable"));
        }
        Ok(fixture("search_page.xml"))
    }
}

fn explorer(fail_first: usize) -> Explorer<CountingTransport> {
    let paging = PagingOptions { page_size: 100, page_delay: Duration::ZERO, retries: 0 };
    let client = ArxivClient::new(CountingTransport::new(fail_first)).with_paging(paging);
    Explorer::with_client(client, &Settings::default())
}

fn params(keywords: &str) -> SearchParams {
    SearchParams::new(
        keywords,
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
        NaiveDate::from_ymd_opt(2024, 12, 31).expect("date"),
        SortMode::Relevance,
        "Computer Science",
    )
}

#[test]
fn identical_searches_hit_the_cache() {
    let explorer = explorer(0);
    let first = explorer.search(&params("time-series, forecasting")).expect("search");
    // same query once quotes and padding are normalized
    let second = explorer.search(&params(" \"time-series\" ,forecasting ")).expect("search");
    assert_eq!(first, second);
    assert_eq!(explorer.client().transport().calls(), 1);

    explorer.search(&params("forecasting")).expect("search");
    assert_eq!(explorer.client().transport().calls(), 2);

    explorer.clear_cache();
    explorer.search(&params("forecasting")).expect("search");
    assert_eq!(explorer.client().transport().calls(), 3);
}

#[test]
fn failures_are_not_cached() {
    let explorer = explorer(1);
    assert!(matches!(explorer.search(&params("forecasting")), Err(Error::SearchFailed)));
    let papers = explorer.search(&params("forecasting")).expect("second attempt");
    assert_eq!(papers.len(), 2);
    assert_eq!(explorer.client().transport().calls(), 2);
}

#[test]
fn explore_clusters_every_paper() {
    let explorer = explorer(0);
    let exploration = explorer.explore(&params("forecasting")).expect("explore");
    assert_eq!(exploration.papers.len(), 2);
    assert_eq!(exploration.clusters.total_papers(), 2);
    let coords = exploration.coordinates.expect("two papers can be projected");
    assert_eq!(coords.len(), 2);

    let json = serde_json::to_value(&exploration.clusters).expect("json");
    assert!(json.get("groups").is_some());
}

#[test]
fn validation_errors_pass_through() {
    let explorer = explorer(0);
    let bad = SearchParams { category: "Astrology".into(), ..params("forecasting") };
    assert!(matches!(explorer.explore(&bad), Err(Error::InvalidCategory { .. })));
    assert_eq!(explorer.client().transport().calls(), 0);
}
