use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("End date {end} must be on or after start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("At least one keyword must be provided")]
    MissingKeywords,

    #[error("Too many keywords provided ({count}). Maximum allowed is {max}")]
    TooManyKeywords { count: usize, max: usize },

    #[error("Invalid arXiv category '{category}'. Categories available: {}", available.join(", "))]
    InvalidCategory { category: String, available: Vec<String> },

    /// Upstream failure. The cause is logged where it happens and deliberately
    /// not carried here.
    #[error("Error fetching papers")]
    SearchFailed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than upstream trouble.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange { .. }
                | Self::MissingKeywords
                | Self::TooManyKeywords { .. }
                | Self::InvalidCategory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
