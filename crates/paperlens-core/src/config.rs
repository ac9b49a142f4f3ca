//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys, so
//! `APP_SEARCH__MAX_RESULTS=50` sets `search.max_results`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{DEFAULT_MAX_RESULTS, MAX_RESULT_CAP};

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    /// Load `config.toml` and the `RUST_ENV` overlay from `base`.
    pub fn load_from(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(base, &env_name)
    }

    pub fn load_for_env(base: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name: env_name.to_string() };
        config.settings()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the full typed settings tree.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub vectorizer: VectorizerSettings,
    pub clustering: ClusterSettings,
    pub projection: ProjectionSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESULT_CAP).contains(&self.search.max_results) {
            return Err(Error::InvalidConfig(format!(
                "search.max_results must be between 1 and {}, got {}",
                MAX_RESULT_CAP, self.search.max_results
            )));
        }
        let non_zero = [
            ("search.page_size", self.search.page_size),
            ("vectorizer.max_features", self.vectorizer.max_features),
            ("clustering.target_clusters", self.clustering.target_clusters),
            ("clustering.top_terms", self.clustering.top_terms),
            ("cache.max_entries", self.cache.max_entries),
        ];
        if let Some((key, _)) = non_zero.iter().find(|(_, v)| *v == 0) {
            return Err(Error::InvalidConfig(format!("{} must be greater than zero", key)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    pub max_results: usize,
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub retries: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://export.arxiv.org/api/query".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            page_size: 100,
            page_delay_ms: 3000,
            retries: 3,
            timeout_secs: 30,
            user_agent: concat!("paperlens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerSettings {
    pub max_features: usize,
}

impl Default for VectorizerSettings {
    fn default() -> Self {
        Self { max_features: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub target_clusters: usize,
    pub top_terms: usize,
    pub seed: u64,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self { target_clusters: 5, top_terms: 3, seed: 42, max_iterations: 300, tolerance: 1e-4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    pub seed: u64,
    pub max_iterations: usize,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self { seed: 42, max_iterations: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 3600, max_entries: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub dir: String,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { dir: "logs".to_string(), file_prefix: "paperlens".to_string() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
