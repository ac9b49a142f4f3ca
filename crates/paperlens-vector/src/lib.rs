//! paperlens-vector
//!
//! Turns papers into TF-IDF rows, partitions them with k-means and projects
//! them onto two principal axes.

pub mod cluster;
pub mod pca;
pub mod stop_words;
pub mod tfidf;
pub mod tokenize;

pub use cluster::{ClusterAssignment, ClusterEngine, ClusterError};
pub use pca::PcaReducer;
pub use tfidf::{TfidfMatrix, TfidfVectorizer};
