//! Batch orchestration.
//!
//! A batch runs in three phases separated by hard barriers:
//!
//! 1. fetch every selected source in turn and deduplicate its headlines into
//!    one flat list (a single browser session serves all dynamic sources);
//! 2. cluster the whole list into stories in one pass;
//! 3. enrich and store each headline on a bounded worker pool.
//!
//! A failing source or task is logged and counted; only lock contention and a
//! missing or invalid configuration abort a run.

mod context;
mod lock;
mod task;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use sqlx::SqlitePool;

use crate::clustering::StoryClusterer;
use crate::config::Config;
use crate::dedup::Deduplicator;
use crate::error_handling::{
    DatabaseError, ErrorType, InfoType, InitializationError, ProcessingStats, WarningType,
};
use crate::fetch::{BrowserSession, HeadlineFetcher};
use crate::initialization::{init_client, init_semaphore};
use crate::models::{FilteredHeadline, StoryCluster};
use crate::sources::{select_sources, SourceConfig, SourceRegistry, SourceSelection};
use crate::storage::{init_db_pool, run_migrations};

pub use context::Capabilities;
pub use lock::RunLock;

use task::{process_headline, HeadlineTask, TaskContext};

/// Results of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Sources chosen by the selection
    pub sources_selected: usize,
    /// Sources that produced no result (retries exhausted or no browser)
    pub sources_failed: usize,
    /// Headlines left after deduplication
    pub headlines: usize,
    /// Stories formed by clustering
    pub stories: usize,
    /// Articles newly written by this batch
    pub new_articles: usize,
    /// Enrichment tasks that failed or panicked
    pub failed_tasks: usize,
    /// New articles whose quotes could not be written
    pub quotes_lost: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// The ingest pipeline with its collaborators wired in.
pub struct Pipeline {
    fetcher: HeadlineFetcher,
    clusterer: StoryClusterer,
    capabilities: Capabilities,
    pool: SqlitePool,
    workers: usize,
}

struct FetchOutcome {
    headlines: Vec<FilteredHeadline>,
    sources_failed: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: HeadlineFetcher,
        capabilities: Capabilities,
        pool: SqlitePool,
        workers: usize,
    ) -> Self {
        let clusterer = StoryClusterer::new(capabilities.embedder.clone());
        Self {
            fetcher,
            clusterer,
            capabilities,
            pool,
            workers: workers.max(1),
        }
    }

    /// Builds a pipeline with the fetch client and clustering parameters
    /// from `config`.
    pub fn from_config(
        config: &Config,
        capabilities: Capabilities,
        pool: SqlitePool,
    ) -> Result<Self, InitializationError> {
        let fetcher = HeadlineFetcher::new(init_client(config)?);
        let pipeline = Self::new(fetcher, capabilities, pool, config.workers)
            .with_clusterer_params(config.min_story_size, config.story_threshold);
        Ok(pipeline)
    }

    pub fn with_clusterer_params(mut self, min_size: usize, threshold: f32) -> Self {
        self.clusterer = self.clusterer.with_params(min_size, threshold);
        self
    }

    /// Runs one batch over the sources picked from `all_sources` by
    /// `selection` and reports how many articles were newly stored.
    pub async fn run_batch(
        &self,
        all_sources: &[SourceConfig],
        selection: &SourceSelection,
    ) -> BatchReport {
        let started = Instant::now();
        let stats = Arc::new(ProcessingStats::new());

        let selected = select_sources(all_sources, selection);
        let mut report = BatchReport {
            sources_selected: selected.len(),
            ..Default::default()
        };
        if selected.is_empty() {
            info!("No sources selected, nothing to do");
            report.elapsed_seconds = started.elapsed().as_secs_f64();
            return report;
        }
        info!("Starting batch over {} sources", selected.len());

        let fetched = self.fetch_all(&selected, &stats).await;
        report.sources_failed = fetched.sources_failed;
        report.headlines = fetched.headlines.len();
        info!("{} headlines after deduplication", fetched.headlines.len());

        if !fetched.headlines.is_empty() {
            let stories = self.cluster(&fetched.headlines, &stats).await;
            report.stories = stories.len();
            let story_ids = story_ids_by_index(fetched.headlines.len(), &stories);

            let (new_articles, failed_tasks) =
                self.enrich_all(fetched.headlines, story_ids, &stats).await;
            report.new_articles = new_articles;
            report.failed_tasks = failed_tasks;
            report.quotes_lost = stats.get_error_count(ErrorType::QuoteWriteError);
        }

        report.elapsed_seconds = started.elapsed().as_secs_f64();
        stats.log_summary();
        info!(
            "Batch finished in {:.1}s: {} new articles from {} headlines ({} stories, {} failed tasks)",
            report.elapsed_seconds,
            report.new_articles,
            report.headlines,
            report.stories,
            report.failed_tasks
        );
        if report.quotes_lost > 0 {
            warn!("Quotes of {} new articles could not be stored", report.quotes_lost);
        }
        report
    }

    async fn fetch_all(&self, sources: &[SourceConfig], stats: &ProcessingStats) -> FetchOutcome {
        let session = self.launch_browser_if_needed(sources, stats).await;

        let mut dedup = Deduplicator::new();
        let mut headlines = Vec::new();
        let mut sources_failed = 0;
        for source in sources {
            if source.is_dynamic() && session.is_none() {
                warn!("Skipping dynamic source {}: no browser available", source.name);
                stats.increment_warning(WarningType::DynamicSourceSkipped);
                sources_failed += 1;
                continue;
            }
            match self.fetcher.fetch(source, session.as_deref()).await {
                Ok(page) => {
                    if page.used_fallback {
                        stats.increment_info(InfoType::FallbackLinksUsed);
                    }
                    if page.headlines.is_empty() {
                        stats.increment_warning(WarningType::EmptySource);
                    }
                    headlines.extend(dedup.filter(page.headlines));
                }
                Err(e) => {
                    log::error!("Giving up on {} ({}): {:#}", source.name, source.url, e);
                    stats.increment_error(ErrorType::SourceFetchError);
                    sources_failed += 1;
                }
            }
        }
        stats.add_info(InfoType::ShortHeadline, dedup.short_dropped());
        stats.add_info(InfoType::DuplicateHeadline, dedup.duplicates_dropped());

        if let Some(session) = session {
            if let Err(e) = session.close().await {
                warn!("Failed to close browser session: {:#}", e);
                stats.increment_error(ErrorType::BrowserCloseError);
            }
        }

        FetchOutcome {
            headlines,
            sources_failed,
        }
    }

    async fn launch_browser_if_needed(
        &self,
        sources: &[SourceConfig],
        stats: &ProcessingStats,
    ) -> Option<Box<dyn BrowserSession>> {
        if !sources.iter().any(SourceConfig::is_dynamic) {
            return None;
        }
        let Some(launcher) = self.capabilities.browser.as_ref() else {
            warn!("Dynamic sources selected but no browser is configured");
            return None;
        };
        match launcher.launch().await {
            Ok(session) => Some(session),
            Err(e) => {
                log::error!("Failed to launch browser: {:#}", e);
                stats.increment_error(ErrorType::BrowserLaunchError);
                None
            }
        }
    }

    async fn cluster(&self, headlines: &[FilteredHeadline], stats: &ProcessingStats) -> Vec<StoryCluster> {
        let texts: Vec<String> = headlines.iter().map(|h| h.text().to_string()).collect();
        match self.clusterer.try_cluster_stories(&texts).await {
            Ok(stories) => stories,
            Err(e) => {
                warn!("Story clustering skipped: {:#}", e);
                stats.increment_warning(WarningType::ClusteringUnavailable);
                Vec::new()
            }
        }
    }

    async fn enrich_all(
        &self,
        headlines: Vec<FilteredHeadline>,
        story_ids: Vec<Option<i64>>,
        stats: &Arc<ProcessingStats>,
    ) -> (usize, usize) {
        let semaphore = init_semaphore(self.workers);
        let ctx = Arc::new(TaskContext {
            capabilities: self.capabilities.clone(),
            pool: self.pool.clone(),
            stats: Arc::clone(stats),
        });

        let mut tasks = FuturesUnordered::new();
        let mut failed_tasks = 0;
        for (headline, story_id) in headlines.into_iter().zip(story_ids) {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Worker pool closed, skipping {}", headline.url());
                    failed_tasks += 1;
                    continue;
                }
            };
            let ctx = Arc::clone(&ctx);
            let url = headline.url().to_string();
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let result = process_headline(HeadlineTask { headline, story_id }, &ctx).await;
                (url, result)
            }));
        }

        let mut new_articles = 0;
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((_, Ok(true))) => new_articles += 1,
                Ok((_, Ok(false))) => stats.increment_info(InfoType::ExistingArticle),
                Ok((url, Err(e))) => {
                    warn!("Failed to process {}: {:#}", url, e);
                    failed_tasks += 1;
                }
                Err(join_error) => {
                    warn!("Enrichment task panicked: {:?}", join_error);
                    stats.increment_error(ErrorType::TaskJoinError);
                    failed_tasks += 1;
                }
            }
        }
        (new_articles, failed_tasks)
    }
}

/// Maps each headline index to the id of the story containing it.
fn story_ids_by_index(len: usize, stories: &[StoryCluster]) -> Vec<Option<i64>> {
    let mut ids = vec![None; len];
    for story in stories {
        for &member in &story.members {
            if let Some(slot) = ids.get_mut(member) {
                *slot = Some(story.id);
            }
        }
    }
    ids
}

/// Runs one complete ingest with the provided configuration.
///
/// Takes the run lock, loads the source registry, opens and migrates the
/// database, wires the capabilities from `config`, and runs a batch.
///
/// # Errors
///
/// Fails if another run holds the lock past `lock_timeout_seconds`, if the
/// registry is missing or invalid, or if the database can't be opened.
/// Failures of individual sources or headlines are only counted in the report.
pub async fn run_ingest(config: Config, selection: SourceSelection) -> Result<BatchReport> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DatabaseError::FileCreationError(e.to_string()))
            .context("Failed to create database directory")?;
    }

    let lock_timeout = Duration::from_secs(config.lock_timeout_seconds);
    let _lock = RunLock::acquire(config.lock_path(), lock_timeout).await?;

    let registry = SourceRegistry::load(&config.sources_path)
        .await
        .context("Failed to load source registry")?;

    let pool = init_db_pool(&config.db_path, config.workers as u32)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let capabilities =
        Capabilities::from_config(&config).context("Failed to initialize capabilities")?;
    let pipeline = Pipeline::from_config(&config, capabilities, pool.clone())
        .context("Failed to initialize HTTP client")?;

    let report = pipeline.run_batch(registry.sources(), &selection).await;

    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(&pool)
        .await
    {
        warn!("Failed to checkpoint WAL file (this is non-critical): {}", e);
    }
    pool.close().await;

    Ok(report)
}
