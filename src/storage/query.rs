//! Read helpers over the stored articles and quotes.

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

use super::models::{ArticleRecord, QuoteRecord};

const ARTICLE_COLUMNS: &str = "id, source, headline, url, collected_at_ms, sentiment_label, \
    sentiment_score, entities, topic, summary, full_text, subjectivity_label, \
    subjectivity_score, latitude, longitude, story_id";

pub async fn find_article_by_url(
    pool: &SqlitePool,
    url: &str,
) -> Result<Option<ArticleRecord>, DatabaseError> {
    let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE url = ?");
    let row = sqlx::query(&sql).bind(url).fetch_optional(pool).await?;
    row.as_ref().map(ArticleRecord::from_row).transpose()
}

pub async fn count_articles(pool: &SqlitePool) -> Result<i64, DatabaseError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Quotes of one article in insertion order.
pub async fn quotes_for_article(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<QuoteRecord>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT id, article_id, quote_text, quoted_person FROM quotes WHERE article_id = ? ORDER BY id",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(QuoteRecord::from_row).collect()
}

/// The `limit` most recently collected articles, newest first.
pub async fn recent_articles(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<ArticleRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY collected_at_ms DESC, id DESC LIMIT ?"
    );
    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    rows.iter().map(ArticleRecord::from_row).collect()
}
