//! Per-headline enrichment and persistence.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::analysis::first_location;
use crate::analysis::Quote;
use crate::config::{
    QUOTE_WRITE_ATTEMPTS, SUMMARY_MAX_LENGTH, SUMMARY_MIN_LENGTH, SUMMARY_PLACEHOLDER,
};
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::models::FilteredHeadline;
use crate::storage::{insert_quotes, upsert_article, ArticleFields};
use crate::utils::sanitize::truncate_for_log;

use super::context::Capabilities;

/// Shared by every task of a batch.
pub(super) struct TaskContext {
    pub capabilities: Capabilities,
    pub pool: SqlitePool,
    pub stats: Arc<ProcessingStats>,
}

/// One unit of work for the worker pool.
pub(super) struct HeadlineTask {
    pub headline: FilteredHeadline,
    pub story_id: Option<i64>,
}

/// Enriches one headline and stores it.
///
/// Returns `true` when the article row was created by this call. Quotes are
/// only extracted and written for such new rows with retrievable text.
pub(super) async fn process_headline(task: HeadlineTask, ctx: &TaskContext) -> Result<bool> {
    let HeadlineTask { headline, story_id } = task;
    let analysis = &ctx.capabilities.analysis;
    let text = headline.text();
    log::debug!("Processing '{}'", truncate_for_log(text, 60));

    let full_text = ctx.capabilities.content.fetch_main_text(headline.url()).await;

    let (sentiment, entities, topic, subjectivity) = tokio::join!(
        analysis.analyze_sentiment(text),
        analysis.extract_entities(text),
        analysis.classify_topic(text),
        analysis.analyze_subjectivity(text),
    );

    let summary = match full_text.as_deref() {
        Some(body) => {
            analysis
                .summarize(body, SUMMARY_MAX_LENGTH, SUMMARY_MIN_LENGTH)
                .await
        }
        None => {
            ctx.stats.increment_warning(WarningType::MissingFullText);
            Some(SUMMARY_PLACEHOLDER.to_string())
        }
    };

    let coordinates = match first_location(&entities) {
        Some(place) => {
            let coords = ctx.capabilities.geocoder.resolve(&place.text).await;
            if coords.is_some() {
                ctx.stats.increment_info(InfoType::Geocoded);
            }
            coords
        }
        None => None,
    };

    let fields = ArticleFields {
        source: headline.source().to_string(),
        headline: text.to_string(),
        url: headline.url().to_string(),
        collected_at_ms: chrono::Utc::now().timestamp_millis(),
        sentiment,
        entities,
        topic,
        summary,
        full_text,
        subjectivity,
        coordinates,
        story_id,
    };

    let outcome = {
        let mut conn = ctx
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;
        match upsert_article(&mut conn, &fields).await {
            Ok(outcome) => outcome,
            Err(e) => {
                ctx.stats.increment_error(ErrorType::ArticleWriteError);
                return Err(e).with_context(|| format!("Failed to store {}", fields.url));
            }
        }
    };

    if !outcome.is_new {
        log::debug!("Already stored: {}", fields.url);
        return Ok(false);
    }

    if let Some(body) = fields.full_text.as_deref() {
        let body_entities = analysis.extract_entities(body).await;
        let quotes = analysis.extract_quotes(body, &body_entities).await;
        if !quotes.is_empty() {
            store_quotes(ctx, outcome.id, &quotes, &fields.url).await;
        }
    }

    Ok(true)
}

/// Writes the quotes of a newly stored article, on a fresh connection per
/// attempt.
///
/// The article row already exists, so later runs skip it; quotes that can't be
/// written here are lost and counted as `QuoteWriteError`.
async fn store_quotes(ctx: &TaskContext, article_id: i64, quotes: &[Quote], url: &str) {
    for attempt in 1..=QUOTE_WRITE_ATTEMPTS {
        let result = match ctx.pool.acquire().await {
            Ok(mut conn) => insert_quotes(&mut conn, article_id, quotes).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(n) => {
                log::debug!("Stored {} quotes for {}", n, url);
                return;
            }
            Err(e) if attempt < QUOTE_WRITE_ATTEMPTS => {
                log::warn!("Quote write attempt {} failed for {}: {:#}", attempt, url, e);
            }
            Err(e) => {
                ctx.stats.increment_error(ErrorType::QuoteWriteError);
                log::error!(
                    "Lost {} quotes for {} after {} attempts: {:#}",
                    quotes.len(),
                    url,
                    attempt,
                    e
                );
            }
        }
    }
}
