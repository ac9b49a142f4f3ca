//! paperlens-explore
//!
//! Ties search, vectorization, clustering and projection into one call and
//! keeps recent search results in a TTL cache.

pub mod cache;

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

use paperlens_core::config::Settings;
use paperlens_core::{Paper, Result, SearchParams};
use paperlens_search::{ArxivClient, HttpTransport, PagingOptions, Transport};
use paperlens_vector::{ClusterAssignment, ClusterEngine, PcaReducer, TfidfMatrix, TfidfVectorizer};

pub use cache::QueryCache;

/// Result of one search-and-cluster cycle. `coordinates` is row-aligned with
/// `papers` and absent when no projection is possible.
#[derive(Debug, Clone, Serialize)]
pub struct Exploration {
    pub papers: Vec<Paper>,
    pub clusters: ClusterAssignment,
    pub coordinates: Option<Vec<(f64, f64)>>,
}

pub struct Explorer<T: Transport> {
    client: ArxivClient<T>,
    vectorizer: TfidfVectorizer,
    clusterer: ClusterEngine,
    reducer: PcaReducer,
    cache: Mutex<QueryCache<SearchParams, Vec<Paper>>>,
}

impl Explorer<HttpTransport> {
    /// Explorer talking to the real arXiv API as configured.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let transport = HttpTransport::from_settings(&settings.search)?;
        let client = ArxivClient::new(transport).with_paging(PagingOptions::from_settings(&settings.search));
        Ok(Self::with_client(client, settings))
    }
}

impl<T: Transport> Explorer<T> {
    pub fn with_client(client: ArxivClient<T>, settings: &Settings) -> Self {
        Self {
            client,
            vectorizer: TfidfVectorizer::from_settings(&settings.vectorizer),
            clusterer: ClusterEngine::from_settings(&settings.clustering),
            reducer: PcaReducer::from_settings(&settings.projection),
            cache: Mutex::new(QueryCache::new(
                Duration::from_secs(settings.cache.ttl_secs),
                settings.cache.max_entries,
            )),
        }
    }

    pub fn client(&self) -> &ArxivClient<T> {
        &self.client
    }

    /// Cached search. Only successful results are stored.
    pub fn search(&self, params: &SearchParams) -> Result<Vec<Paper>> {
        let key = params.canonical();
        if let Some(hit) = self.lock_cache().get(&key) {
            debug!(count = hit.len(), "search served from cache");
            return Ok(hit);
        }
        let papers = self.client.search(&key)?;
        self.lock_cache().insert(key, papers.clone());
        Ok(papers)
    }

    /// Search, then cluster and project the results.
    pub fn explore(&self, params: &SearchParams) -> Result<Exploration> {
        let papers = self.search(params)?;
        let Some(matrix) = self.vectorizer.vectorize(&papers) else {
            info!("no papers to cluster");
            return Ok(Exploration {
                clusters: self.clusterer.cluster(&TfidfMatrix::default(), &papers),
                papers,
                coordinates: None,
            });
        };
        let clusters = self.clusterer.cluster(&matrix, &papers);
        let coordinates = self.reducer.reduce_to_2d(&matrix);
        if coordinates.is_none() {
            info!(papers = papers.len(), "no visualization available");
        }
        info!(papers = papers.len(), clusters = clusters.len(), "exploration ready");
        Ok(Exploration { papers, clusters, coordinates })
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, QueryCache<SearchParams, Vec<Paper>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
