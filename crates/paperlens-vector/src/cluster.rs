//! K-means partitioning of TF-IDF rows with centroid-term labels.
//!
//! Clustering never fails outward: degenerate input or an algorithm error
//! degrades to a single cluster holding every paper.

use linfa::dataset::AsTargets;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Axis};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use paperlens_core::config::ClusterSettings;
use paperlens_core::Paper;

use crate::tfidf::TfidfMatrix;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("matrix has {rows} rows but {papers} papers were given")]
    RowMismatch { rows: usize, papers: usize },

    #[error("vocabulary is empty")]
    EmptyVocabulary,

    #[error("only {0} distinct document vectors")]
    Degenerate(usize),

    #[error("k-means failed: {0}")]
    KMeans(String),
}

/// Papers grouped by cluster id, with the top centroid terms of each group.
/// Only non-empty clusters are present; ids iterate in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    pub groups: BTreeMap<usize, Vec<Paper>>,
    pub labels: BTreeMap<usize, Vec<String>>,
}

impl ClusterAssignment {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_papers(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn cluster_of(&self, paper_id: &str) -> Option<usize> {
        self.groups
            .iter()
            .find(|(_, papers)| papers.iter().any(|p| p.id == paper_id))
            .map(|(id, _)| *id)
    }

    pub fn labels_for(&self, cluster: usize) -> &[String] {
        self.labels.get(&cluster).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct ClusterEngine {
    target_clusters: usize,
    top_terms: usize,
    seed: u64,
    max_iterations: u64,
    tolerance: f64,
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::from_settings(&ClusterSettings::default())
    }
}

impl ClusterEngine {
    pub fn from_settings(settings: &ClusterSettings) -> Self {
        Self {
            target_clusters: settings.target_clusters.max(1),
            top_terms: settings.top_terms,
            seed: settings.seed,
            max_iterations: settings.max_iterations.max(1),
            tolerance: settings.tolerance,
        }
    }

    pub fn with_target_clusters(mut self, target: usize) -> Self {
        self.target_clusters = target.max(1);
        self
    }

    pub fn with_top_terms(mut self, top_terms: usize) -> Self {
        self.top_terms = top_terms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fewer than 2 papers gives one trivial cluster. Otherwise the target,
    /// capped at the paper count and never below 2.
    pub fn cluster_count(&self, n_papers: usize) -> usize {
        if n_papers < 2 {
            1
        } else {
            self.target_clusters.min(n_papers).max(2)
        }
    }

    /// Partition `papers` (row-aligned with `matrix`) into clusters.
    pub fn cluster(&self, matrix: &TfidfMatrix, papers: &[Paper]) -> ClusterAssignment {
        if papers.len() < 2 {
            return self.single(matrix, papers);
        }
        match self.try_cluster(matrix, papers) {
            Ok(assignment) => assignment,
            Err(e) => {
                warn!(error = %e, papers = papers.len(), "clustering failed, using a single cluster");
                self.single(matrix, papers)
            }
        }
    }

    fn try_cluster(&self, matrix: &TfidfMatrix, papers: &[Paper]) -> Result<ClusterAssignment, ClusterError> {
        let rows = matrix.n_rows();
        if rows != papers.len() {
            return Err(ClusterError::RowMismatch { rows, papers: papers.len() });
        }
        if matrix.n_terms() == 0 {
            return Err(ClusterError::EmptyVocabulary);
        }
        let distinct = distinct_rows(matrix);
        if distinct < 2 {
            return Err(ClusterError::Degenerate(distinct));
        }
        let k = self.cluster_count(rows).min(distinct);

        let dataset = DatasetBase::from(matrix.values.clone());
        let rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let model = KMeans::params_with_rng(k, rng)
            .max_n_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .fit(&dataset)
            .map_err(|e| ClusterError::KMeans(e.to_string()))?;

        let predictions = model.predict(&dataset);
        let assigned: Vec<usize> = predictions.as_targets().iter().copied().collect();
        if assigned.len() != rows {
            return Err(ClusterError::RowMismatch { rows: assigned.len(), papers: rows });
        }

        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (row, cluster) in assigned.into_iter().enumerate() {
            members.entry(cluster).or_default().push(row);
        }
        debug!(k, clusters = members.len(), "k-means converged");

        let mut groups = BTreeMap::new();
        let mut labels = BTreeMap::new();
        for (cluster, rows) in members {
            labels.insert(cluster, self.label(matrix, &rows));
            groups.insert(cluster, rows.iter().map(|&r| papers[r].clone()).collect());
        }
        Ok(ClusterAssignment { groups, labels })
    }

    /// Everything in cluster 0, labeled from the mean row when rows line up.
    fn single(&self, matrix: &TfidfMatrix, papers: &[Paper]) -> ClusterAssignment {
        let terms = if matrix.n_rows() == papers.len() {
            self.label(matrix, &(0..papers.len()).collect::<Vec<_>>())
        } else {
            Vec::new()
        };
        ClusterAssignment {
            groups: BTreeMap::from([(0, papers.to_vec())]),
            labels: BTreeMap::from([(0, terms)]),
        }
    }

    /// Top terms of the centroid of `rows`: weight descending, ties by column,
    /// zero weights skipped.
    fn label(&self, matrix: &TfidfMatrix, rows: &[usize]) -> Vec<String> {
        if rows.is_empty() || matrix.n_terms() == 0 {
            return Vec::new();
        }
        let Some(centroid) = matrix.values.select(Axis(0), rows).mean_axis(Axis(0)) else {
            return Vec::new();
        };
        top_terms(&centroid, &matrix.vocabulary, self.top_terms)
    }
}

fn top_terms(centroid: &Array1<f64>, vocabulary: &[String], k: usize) -> Vec<String> {
    let mut ranked: Vec<(usize, f64)> = centroid.iter().copied().enumerate().filter(|(_, w)| *w > 0.0).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(k)
        .filter_map(|(j, _)| vocabulary.get(j).cloned())
        .collect()
}

fn distinct_rows(matrix: &TfidfMatrix) -> usize {
    matrix
        .values
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn top_terms_skip_zero_weights_and_break_ties_by_column() {
        let vocab: Vec<String> = ["alpha", "beta", "gamma", "delta"].iter().map(|s| s.to_string()).collect();
        let centroid = array![0.5, 0.0, 0.5, 0.2];
        assert_eq!(top_terms(&centroid, &vocab, 3), vec!["alpha", "gamma", "delta"]);
        assert_eq!(top_terms(&array![0.0, 0.0, 0.0, 0.0], &vocab, 3), Vec::<String>::new());
    }

    #[test]
    fn cluster_count_policy() {
        let engine = ClusterEngine::default();
        assert_eq!(engine.cluster_count(0), 1);
        assert_eq!(engine.cluster_count(1), 1);
        assert_eq!(engine.cluster_count(2), 2);
        assert_eq!(engine.cluster_count(7), 5);
        assert_eq!(engine.clone().with_target_clusters(1).cluster_count(10), 2);
    }
}
