//! paperlens-core
//!
//! Domain types, the arXiv category taxonomy, the error enum shared by every
//! crate, and the figment-based configuration loader.

pub mod config;
pub mod error;
pub mod taxonomy;
pub mod types;

pub use error::{Error, Result};
pub use taxonomy::Taxonomy;
pub use types::{Paper, SearchParams, SortMode};
