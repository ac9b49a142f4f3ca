use std::collections::HashSet;
use std::fs;

use chrono::NaiveDate;
use tempfile::TempDir;

use paperlens_core::config::{resolve_with_base, Config, Settings};
use paperlens_core::{Error, Taxonomy};

#[test]
fn every_label_has_codes_and_codes_are_unique() {
    let taxonomy = Taxonomy::arxiv();
    let mut seen = HashSet::new();
    for domain in taxonomy.domains() {
        assert!(!domain.subjects.is_empty(), "{} has no subject codes", domain.label);
        for subject in domain.subjects {
            assert!(seen.insert(subject.code), "duplicate code {}", subject.code);
        }
    }
    assert_eq!(seen.len(), taxonomy.len());
}

#[test]
fn forward_and_reverse_lookup_agree() {
    let taxonomy = Taxonomy::arxiv();
    let cs = taxonomy.codes_for("Computer Science").expect("cs codes");
    assert!(cs.iter().all(|c| c.starts_with("cs.")));
    assert!(cs.contains(&"cs.LG"));
    assert_eq!(taxonomy.display_name("cs.LG"), Some("Machine Learning"));
    assert_eq!(taxonomy.label_of("hep-th"), Some("Physics"));
    assert!(taxonomy.is_display_name("Artificial Intelligence"));
    assert_eq!(taxonomy.display_name("68T05"), None);
    assert!(taxonomy.codes_for("Astrology").is_none());
}

#[test]
fn labels_keep_display_order() {
    let labels = Taxonomy::arxiv().labels();
    assert_eq!(labels.first(), Some(&"Computer Science"));
    assert_eq!(labels.len(), 8);
    assert!(labels.contains(&"Electrical Eng. & Systems Sci."));
}

#[test]
fn config_defaults_without_files() {
    let tmp = TempDir::new().expect("tmp");
    let config = Config::load_for_env(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.search.max_results, 200);
    assert_eq!(settings.clustering.target_clusters, 5);
    assert_eq!(settings.vectorizer.max_features, 1000);
}

#[test]
fn config_env_file_overrides_base_file() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(
        tmp.path().join("config.toml"),
        "[search]\nmax_results = 50\npage_size = 25\n\n[cache]\nttl_secs = 60\n",
    )
    .expect("write base");
    fs::write(tmp.path().join("config.test.toml"), "[search]\nmax_results = 10\n").expect("write overlay");

    let config = Config::load_for_env(tmp.path(), "test").expect("load");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.search.max_results, 10);
    assert_eq!(settings.search.page_size, 25);
    assert_eq!(settings.cache.ttl_secs, 60);
    assert_eq!(config.get::<u64>("cache.ttl_secs").expect("key"), 60);
}

#[test]
fn config_rejects_out_of_range_cap() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("config.toml"), "[search]\nmax_results = 5000\n").expect("write");
    assert!(Config::load_for_env(tmp.path(), "prod").is_err());
}

#[test]
fn settings_reject_zero_clusters() {
    let mut settings = Settings::default();
    settings.clustering.target_clusters = 0;
    let err = settings.validate().expect_err("zero clusters");
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("clustering.target_clusters")));
}

#[test]
fn relative_paths_resolve_against_base() {
    let tmp = TempDir::new().expect("tmp");
    assert_eq!(resolve_with_base(tmp.path(), "logs"), tmp.path().join("logs"));
    assert_eq!(resolve_with_base(tmp.path(), "/var/log"), std::path::PathBuf::from("/var/log"));
}

#[test]
fn search_failed_hides_its_cause() {
    assert_eq!(Error::SearchFailed.to_string(), "Error fetching papers");
    assert!(!Error::SearchFailed.is_validation());

    let start = NaiveDate::from_ymd_opt(2024, 5, 2).expect("date");
    let end = NaiveDate::from_ymd_opt(2024, 5, 1).expect("date");
    let err = Error::InvalidDateRange { start, end };
    assert!(err.is_validation());
    assert!(err.to_string().contains("2024-05-01"));
}
