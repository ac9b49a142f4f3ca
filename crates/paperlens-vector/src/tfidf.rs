//! TF-IDF document vectors over a bounded vocabulary.
//!
//! Weights are raw term count times smooth idf `ln((1 + n) / (1 + df)) + 1`,
//! and every row is scaled to unit L2 length so Euclidean distance between
//! rows tracks cosine similarity.

use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;
use tracing::debug;

use paperlens_core::config::VectorizerSettings;
use paperlens_core::Paper;

use crate::tokenize::{build_analyzer, tokenize};

pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// One row per document, one column per vocabulary term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfMatrix {
    pub values: Array2<f64>,
    /// Column labels, sorted alphabetically.
    pub vocabulary: Vec<String>,
}

impl TfidfMatrix {
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self { max_features: max_features.max(1) }
    }

    pub fn from_settings(settings: &VectorizerSettings) -> Self {
        Self::new(settings.max_features)
    }

    /// Vectorize `"{title} {abstract}"` of each paper. `None` for no papers.
    pub fn vectorize(&self, papers: &[Paper]) -> Option<TfidfMatrix> {
        let docs: Vec<String> = papers.iter().map(Paper::document_text).collect();
        self.vectorize_texts(&docs)
    }

    pub fn vectorize_texts<S: AsRef<str>>(&self, docs: &[S]) -> Option<TfidfMatrix> {
        if docs.is_empty() {
            return None;
        }
        let mut analyzer = build_analyzer();
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenize(&mut analyzer, d.as_ref())).collect();

        let vocabulary = self.select_vocabulary(&tokenized);
        let index: HashMap<&str, usize> = vocabulary.iter().enumerate().map(|(j, t)| (t.as_str(), j)).collect();

        let n = tokenized.len();
        let mut values = Array2::<f64>::zeros((n, vocabulary.len()));
        let mut doc_freq = vec![0usize; vocabulary.len()];
        for (i, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                if let Some(&j) = index.get(token.as_str()) {
                    if values[[i, j]] == 0.0 {
                        doc_freq[j] += 1;
                    }
                    values[[i, j]] += 1.0;
                }
            }
        }

        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        for mut row in values.rows_mut() {
            for (w, weight) in row.iter_mut().zip(&idf) {
                *w *= weight;
            }
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }

        debug!(documents = n, terms = vocabulary.len(), "vectorized corpus");
        Some(TfidfMatrix { values, vocabulary })
    }

    /// Most frequent terms across the corpus (ties by term), sorted alphabetically.
    fn select_vocabulary(&self, tokenized: &[Vec<String>]) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in tokenized.iter().flatten() {
            *counts.entry(token.as_str()).or_default() += 1;
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();
        vocabulary
    }
}
