//! Domain types shared by the search, vector and explore crates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Results requested from arXiv when the caller does not say otherwise.
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// Hard ceiling on the result cap of a single search.
pub const MAX_RESULT_CAP: usize = 1000;

/// One arXiv search result.
///
/// - `id`: short arXiv identifier including version (e.g. `2401.01234v2`)
/// - `link`: canonical abstract page, `pdf_link`: direct PDF
/// - `primary_category`/`categories`: display names resolved through the taxonomy;
///   codes the taxonomy does not know are kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub link: String,
    pub pdf_link: String,
    pub primary_category: String,
    pub categories: Vec<String>,
}

impl Paper {
    /// Text fed to the vectorizer: title and abstract joined by a space.
    pub fn document_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }
}

/// Result ordering requested from arXiv.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Relevance,
    SubmissionTime,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::SubmissionTime => "submission-time",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "submitted" | "submitted-date" | "submission-time" | "submitteddate" => Ok(Self::SubmissionTime),
            other => Err(format!("unknown sort mode '{}' (expected 'relevance' or 'submitted')", other)),
        }
    }
}

/// Everything a search call needs. Also the cache key once canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParams {
    pub keywords: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sort_by: SortMode,
    pub category: String,
    pub max_results: usize,
}

impl SearchParams {
    /// Build params from a comma-separated keyword string such as
    /// `"time-series, forecasting"`.
    pub fn new(
        keywords: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        sort_by: SortMode,
        category: impl Into<String>,
    ) -> Self {
        Self {
            keywords: parse_keywords(keywords),
            start_date,
            end_date,
            sort_by,
            category: category.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Keywords sanitized the same way the query builder does it, empties
    /// dropped. Two params that build the same query compare equal after this.
    pub fn canonical(&self) -> Self {
        Self {
            keywords: self
                .keywords
                .iter()
                .map(|k| sanitize_keyword(k))
                .filter(|k| !k.is_empty())
                .collect(),
            category: self.category.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Split a comma-separated keyword string, trimming each item and dropping empties.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip double quotes and collapse whitespace runs to single spaces. Quotes
/// inside a keyword would otherwise break the quoted phrase literal. A keyword
/// with no letter or digit left sanitizes to the empty string.
pub fn sanitize_keyword(keyword: &str) -> String {
    let cleaned = keyword.replace('"', "");
    if !cleaned.chars().any(char::is_alphanumeric) {
        return String::new();
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keywords_trims_and_drops_empty_items() {
        assert_eq!(parse_keywords(" planning, PDDL ,, "), vec!["planning", "PDDL"]);
        assert!(parse_keywords("  ").is_empty());
    }

    #[test]
    fn sort_mode_accepts_original_spellings() {
        assert_eq!("relevance".parse::<SortMode>(), Ok(SortMode::Relevance));
        assert_eq!("Submitted".parse::<SortMode>(), Ok(SortMode::SubmissionTime));
        assert!("newest".parse::<SortMode>().is_err());
    }

    #[test]
    fn canonical_params_ignore_quotes_and_blank_keywords() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        let mut a = SearchParams::new("\"llm\", agents", d, d, SortMode::Relevance, "Computer Science");
        a.keywords.push("  \" ".to_string());
        let b = SearchParams::new("llm,agents", d, d, SortMode::Relevance, " Computer Science ");
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn sanitize_collapses_whitespace_and_drops_punctuation_only_keywords() {
        assert_eq!(sanitize_keyword("neural\tnetworks"), "neural networks");
        assert_eq!(sanitize_keyword("  graph \n  neural   nets "), "graph neural nets");
        assert_eq!(sanitize_keyword("-"), "");
        assert_eq!(sanitize_keyword("\" -- \""), "");
        assert_eq!(sanitize_keyword("time-series"), "time-series");
    }
}
