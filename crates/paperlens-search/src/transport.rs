use anyhow::{Context, Result};
use std::time::Duration;

use paperlens_core::config::SearchSettings;
use paperlens_core::SortMode;

/// One page request against the arXiv query endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub query: String,
    pub start: usize,
    pub max_results: usize,
    pub sort: SortMode,
}

impl FeedRequest {
    /// Query-string pairs in the order arXiv documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let sort_by = match self.sort {
            SortMode::Relevance => "relevance",
            SortMode::SubmissionTime => "submittedDate",
        };
        vec![
            ("search_query", self.query.clone()),
            ("start", self.start.to_string()),
            ("max_results", self.max_results.to_string()),
            ("sortBy", sort_by.to_string()),
            ("sortOrder", "descending".to_string()),
        ]
    }
}

/// Fetches one raw Atom page. Implementations decide how bytes get here.
pub trait Transport: Send + Sync {
    fn fetch(&self, request: &FeedRequest) -> Result<String>;
}

/// Blocking HTTP transport against the public arXiv API.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url: base_url.into() })
    }

    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
            &settings.user_agent,
        )
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, request: &FeedRequest) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&request.params())
            .send()
            .with_context(|| format!("request to {} failed", self.base_url))?
            .error_for_status()
            .context("arXiv returned an error status")?;
        response.text().context("failed to read arXiv response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_sort_maps_to_submitted_date() {
        let req = FeedRequest {
            query: "cat:cs.AI".into(),
            start: 100,
            max_results: 50,
            sort: SortMode::SubmissionTime,
        };
        let params = req.params();
        assert!(params.contains(&("sortBy", "submittedDate".to_string())));
        assert!(params.contains(&("start", "100".to_string())));
        assert!(params.contains(&("sortOrder", "descending".to_string())));
    }
}
