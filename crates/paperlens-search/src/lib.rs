//! paperlens-search
//!
//! Builds arXiv boolean queries and runs them through a [`Transport`], mapping
//! Atom feed entries into [`paperlens_core::Paper`] values.

pub mod atom;
pub mod client;
pub mod query;
pub mod transport;

pub use client::{ArxivClient, PagingOptions};
pub use query::{build_query, Field, Query, Term, MAX_KEYWORDS};
pub use transport::{FeedRequest, HttpTransport, Transport};
