use anyhow::{Context, Result};
use chrono::{Local, Months, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use paperlens_core::config::{resolve_with_base, Config, LoggingSettings, Settings};
use paperlens_core::{Error, Paper, SearchParams, SortMode, Taxonomy};
use paperlens_explore::{Exploration, Explorer};

const DEFAULT_KEYWORDS: &str = "large language models, multi-agent systems";
const PREVIEW_COUNT: usize = 5;
const UPSTREAM_DOWN: &str = "We couldn't fetch papers right now. Please try again in a few minutes.";

#[derive(Parser, Debug)]
#[command(name = "paperlens")]
#[command(version, about = "Search arXiv by keyword and category, then cluster the results", long_about = None)]
struct Cli {
    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding config.toml and its env overlays
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and print the first results
    Search(SearchArgs),
    /// Search, cluster and project the results
    Explore {
        #[command(flatten)]
        search: SearchArgs,

        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Skip the 2D projection
        #[arg(long)]
        no_coords: bool,
    },
    /// List the category labels and their subject codes
    Categories,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Comma-separated keywords or phrases, e.g. "planning, PDDL"
    #[arg(short, long, default_value = DEFAULT_KEYWORDS)]
    keywords: String,

    #[arg(short, long, default_value = "Computer Science")]
    category: String,

    /// Defaults to one year before today
    #[arg(long, value_name = "YYYY-MM-DD")]
    start_date: Option<NaiveDate>,

    /// Defaults to today
    #[arg(long, value_name = "YYYY-MM-DD")]
    end_date: Option<NaiveDate>,

    /// relevance or submitted
    #[arg(short, long, default_value = "relevance")]
    sort_by: SortMode,

    /// Result cap, 1..=1000
    #[arg(short, long)]
    max_results: Option<usize>,
}

impl SearchArgs {
    fn to_params(&self, settings: &Settings) -> SearchParams {
        let today = Local::now().date_naive();
        let start = self
            .start_date
            .unwrap_or_else(|| today.checked_sub_months(Months::new(12)).unwrap_or(today));
        let end = self.end_date.unwrap_or(today);
        let keywords = if self.keywords.trim().is_empty() { DEFAULT_KEYWORDS } else { &self.keywords };
        SearchParams::new(keywords, start, end, self.sort_by, self.category.clone())
            .with_max_results(self.max_results.unwrap_or(settings.search.max_results))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(Error::SearchFailed) => eprintln!("{}", UPSTREAM_DOWN),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = cli.config_dir.unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load_from(&base)?;
    let settings = config.settings()?;
    setup_logging(&settings.logging, &base, cli.verbose)?;
    tracing::debug!(env = config.env_name(), "configuration loaded");

    match cli.command {
        Command::Categories => {
            print_categories(Taxonomy::arxiv());
            Ok(())
        }
        Command::Search(args) => {
            let explorer = Explorer::from_settings(&settings)?;
            let params = args.to_params(&settings);
            let papers = with_spinner("Searching papers...", || explorer.search(&params))?;
            print_preview(&papers);
            Ok(())
        }
        Command::Explore { search, format, no_coords } => {
            let explorer = Explorer::from_settings(&settings)?;
            let params = search.to_params(&settings);
            let mut exploration = with_spinner("Searching and clustering papers...", || explorer.explore(&params))?;
            if no_coords {
                exploration.coordinates = None;
            }
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&exploration)?),
                Format::Table => print_exploration(&exploration),
            }
            Ok(())
        }
    }
}

/// Daily log file `<dir>/<file_prefix>.YYYY-MM-DD`, plus stderr when `verbose`.
fn setup_logging(logging: &LoggingSettings, base: &Path, verbose: bool) -> Result<()> {
    let appender = daily_log_appender(logging, base)?;
    let stderr = verbose.then(|| fmt::layer().with_writer(std::io::stderr));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(appender))
        .with(stderr)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("logging already initialized")?;
    Ok(())
}

fn daily_log_appender(logging: &LoggingSettings, base: &Path) -> Result<RollingFileAppender> {
    let dir = resolve_with_base(base, &logging.dir);
    fs::create_dir_all(&dir).with_context(|| format!("cannot create log dir {}", dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&logging.file_prefix)
        .build(&dir)
        .with_context(|| format!("cannot open log file in {}", dir.display()))
}

fn with_spinner<T>(message: &str, work: impl FnOnce() -> paperlens_core::Result<T>) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = work();
    pb.finish_and_clear();
    Ok(out?)
}

fn print_categories(taxonomy: &Taxonomy) {
    for domain in taxonomy.domains() {
        println!("{}", domain.label);
        for subject in domain.subjects {
            println!("  {:<18} {}", subject.code, subject.name);
        }
    }
}

fn print_preview(papers: &[Paper]) {
    for (i, paper) in papers.iter().take(PREVIEW_COUNT).enumerate() {
        println!("[{}] {} - {}", i + 1, paper.id, paper.title);
        println!("Authors: {}", paper.authors.join(", "));
        println!("{}", paper.abstract_text);
        println!();
    }
    println!();
    println!("Total papers found: {}", papers.len());
}

fn print_exploration(exploration: &Exploration) {
    println!("{} Papers Found", exploration.papers.len());
    if exploration.papers.is_empty() {
        println!("No papers found. Try adjusting your keywords or search period.");
        return;
    }
    let coords: Option<std::collections::HashMap<&str, (f64, f64)>> = exploration.coordinates.as_ref().map(|c| {
        exploration.papers.iter().map(|p| p.id.as_str()).zip(c.iter().copied()).collect()
    });

    for (cluster, papers) in &exploration.clusters.groups {
        let labels = exploration.clusters.labels_for(*cluster);
        println!();
        println!("Cluster {} ({} papers): {}", cluster, papers.len(), labels.join(", "));
        for paper in papers {
            let date = paper.published.format("%d/%m/%Y");
            match coords.as_ref().and_then(|m| m.get(paper.id.as_str())) {
                Some((x, y)) => println!("  {} {} [{:+.3}, {:+.3}] {}", date, paper.id, x, y, paper.title),
                None => println!("  {} {} {}", date, paper.id, paper.title),
            }
        }
    }
    if exploration.coordinates.is_none() {
        println!();
        println!("No visualization available.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_dated_under_the_configured_dir() {
        let base = tempfile::tempdir().expect("tempdir");
        let logging = LoggingSettings { dir: "nested/logs".to_string(), file_prefix: "paperlens".to_string() };

        let mut appender = daily_log_appender(&logging, base.path()).expect("appender");
        appender.write_all(b"search started\n").expect("write");
        appender.flush().expect("flush");

        let dir = base.path().join("nested/logs");
        let names: Vec<String> = fs::read_dir(&dir)
            .expect("log dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(names, vec![format!("paperlens.{}", today)]);

        let content = fs::read_to_string(dir.join(&names[0])).expect("log file");
        assert!(content.contains("search started"));
    }
}
