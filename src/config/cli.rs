//! Command-line options.
//!
//! Parsed with `clap` and converted into the library [`Config`]. Endpoint
//! options can also come from the environment (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DB_PATH, DEFAULT_HEADLINE_SELECTOR, DEFAULT_USER_AGENT, DEFAULT_WORKERS, FETCH_TIMEOUT_SECS,
    RUN_LOCK_TIMEOUT_SECS, SOURCES_PATH,
};
use crate::config::types::{Config, LogFormat, LogLevel};
use crate::sources::{FetchStrategy, OriginType};

/// Collects headlines from configured news sources into a SQLite database.
#[derive(Debug, Parser)]
#[command(name = "news_ingest", version, about)]
pub struct Opt {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Source registry (JSON)
    #[arg(long, global = true, default_value = SOURCES_PATH)]
    pub sources: PathBuf,

    /// SQLite database file
    #[arg(long, global = true, default_value = DB_PATH)]
    pub db_path: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, cluster, enrich and store headlines
    Scrape(ScrapeOpts),
    /// Inspect or edit the source registry
    #[command(subcommand)]
    Sources(SourcesCommand),
}

#[derive(Debug, Args)]
pub struct ScrapeOpts {
    /// Restrict the run to these sources (repeatable); defaults to active sources
    #[arg(long = "source", id = "source", value_name = "NAME")]
    pub sources: Vec<String>,

    /// Number of concurrent enrichment workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout for source pages in seconds
    #[arg(long, default_value_t = FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Seconds to wait for another run to finish before giving up
    #[arg(long, default_value_t = RUN_LOCK_TIMEOUT_SECS)]
    pub lock_timeout_seconds: u64,

    #[arg(long, env = "BROWSERLESS_URL")]
    pub browserless_url: Option<String>,

    #[arg(long, env = "BROWSERLESS_TOKEN", hide_env_values = true)]
    pub browserless_token: Option<String>,

    /// NLP analysis service base URL
    #[arg(long, env = "ANALYSIS_URL")]
    pub analysis_url: Option<String>,

    /// Embedding service base URL (story clustering)
    #[arg(long, env = "EMBEDDING_URL")]
    pub embedding_url: Option<String>,

    /// Nominatim-compatible geocoder base URL
    #[arg(long, env = "GEOCODER_URL")]
    pub geocoder_url: Option<String>,

    /// Region appended to place names before geocoding
    #[arg(long, env = "GEOCODE_REGION")]
    pub geocode_region: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SourcesCommand {
    /// List configured sources
    List,
    /// Register a new source
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long, value_enum, default_value_t = FetchStrategy::Static)]
        method: FetchStrategy,
        #[arg(long, default_value = DEFAULT_HEADLINE_SELECTOR)]
        selector: String,
        #[arg(long = "type", value_enum, default_value_t = OriginType::Local)]
        origin: OriginType,
        /// Register the source as inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Flip the active flag of a source
    Toggle { name: String },
}

impl Opt {
    /// Builds the library configuration for a scrape run.
    pub fn to_config(&self, scrape: &ScrapeOpts) -> Config {
        Config {
            sources_path: self.global.sources.clone(),
            db_path: self.global.db_path.clone(),
            log_level: self.global.log_level.clone(),
            log_format: self.global.log_format.clone(),
            workers: scrape.workers.max(1),
            timeout_seconds: scrape.timeout_seconds,
            user_agent: scrape.user_agent.clone(),
            lock_timeout_seconds: scrape.lock_timeout_seconds,
            browserless_url: scrape.browserless_url.clone(),
            browserless_token: scrape.browserless_token.clone(),
            analysis_url: scrape.analysis_url.clone(),
            embedding_url: scrape.embedding_url.clone(),
            geocoder_url: scrape.geocoder_url.clone(),
            geocode_region: scrape.geocode_region.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_without_sources_selects_nothing_explicitly() {
        let opt = Opt::try_parse_from(["news_ingest", "scrape"]).expect("valid args");
        match opt.command {
            Command::Scrape(ref scrape) => {
                assert!(scrape.sources.is_empty());
                assert_eq!(scrape.workers, DEFAULT_WORKERS);
            }
            _ => panic!("expected scrape"),
        }
    }

    #[test]
    fn test_scrape_with_repeated_sources() {
        let opt = Opt::try_parse_from([
            "news_ingest",
            "--db-path",
            "/tmp/x.db",
            "scrape",
            "--source",
            "Daily",
            "--source",
            "Herald",
            "--workers",
            "0",
        ])
        .expect("valid args");
        let Command::Scrape(ref scrape) = opt.command else {
            panic!("expected scrape");
        };
        assert_eq!(scrape.sources, vec!["Daily", "Herald"]);
        let config = opt.to_config(scrape);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_sources_add_defaults() {
        let opt = Opt::try_parse_from([
            "news_ingest",
            "sources",
            "add",
            "--name",
            "Daily",
            "--url",
            "https://daily.example",
        ])
        .expect("valid args");
        match opt.command {
            Command::Sources(SourcesCommand::Add {
                method,
                selector,
                origin,
                inactive,
                ..
            }) => {
                assert_eq!(method, FetchStrategy::Static);
                assert_eq!(selector, DEFAULT_HEADLINE_SELECTOR);
                assert_eq!(origin, OriginType::Local);
                assert!(!inactive);
            }
            _ => panic!("expected sources add"),
        }
    }
}
