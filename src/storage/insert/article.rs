//! Article upsert.

use sqlx::{Connection, SqliteConnection};

use crate::error_handling::DatabaseError;
use crate::storage::models::{ArticleFields, UpsertOutcome};

/// Inserts the article unless its url is already stored.
///
/// For an existing url nothing is overwritten except `story_id`, which is
/// filled in only when it is still NULL. The `UNIQUE(url)` constraint makes
/// the insert-or-skip decision atomic even with concurrent writers.
pub async fn upsert_article(
    conn: &mut SqliteConnection,
    fields: &ArticleFields,
) -> Result<UpsertOutcome, DatabaseError> {
    let entities = serde_json::to_string(&fields.entities)?;
    let mut tx = conn.begin().await?;

    let inserted: Option<i64> = sqlx::query_scalar(
        "INSERT INTO articles (
            source, headline, url, collected_at_ms,
            sentiment_label, sentiment_score, entities, topic, summary, full_text,
            subjectivity_label, subjectivity_score, latitude, longitude, story_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(url) DO NOTHING
        RETURNING id",
    )
    .bind(&fields.source)
    .bind(&fields.headline)
    .bind(&fields.url)
    .bind(fields.collected_at_ms)
    .bind(fields.sentiment.as_ref().map(|s| s.label.as_str()))
    .bind(fields.sentiment.as_ref().map(|s| s.score))
    .bind(&entities)
    .bind(fields.topic.as_deref())
    .bind(fields.summary.as_deref())
    .bind(fields.full_text.as_deref())
    .bind(fields.subjectivity.as_ref().map(|s| s.label.as_str()))
    .bind(fields.subjectivity.as_ref().map(|s| s.score))
    .bind(fields.coordinates.map(|c| c.latitude))
    .bind(fields.coordinates.map(|c| c.longitude))
    .bind(fields.story_id)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match inserted {
        Some(id) => UpsertOutcome { id, is_new: true },
        None => {
            let id: i64 = sqlx::query_scalar(
                "UPDATE articles SET story_id = COALESCE(story_id, ?)
                 WHERE url = ?
                 RETURNING id",
            )
            .bind(fields.story_id)
            .bind(&fields.url)
            .fetch_one(&mut *tx)
            .await?;
            UpsertOutcome { id, is_new: false }
        }
    };

    tx.commit().await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Entity, EntityLabel, Sentiment};
    use crate::storage::test_helpers::create_test_pool;
    use crate::storage::{count_articles, find_article_by_url};

    fn fields(url: &str, story_id: Option<i64>) -> ArticleFields {
        ArticleFields {
            source: "Daily".into(),
            headline: "Senate passes the new budget bill".into(),
            url: url.into(),
            collected_at_ms: 1_704_067_200_000,
            sentiment: Some(Sentiment {
                label: "NEU".into(),
                score: 0.8,
            }),
            entities: vec![Entity {
                text: "Senate".into(),
                label: EntityLabel::Org,
                start: 0,
                end: 6,
            }],
            story_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_then_skip() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.expect("connection");

        let first = upsert_article(&mut conn, &fields("https://x.example/1", None))
            .await
            .expect("first upsert");
        assert!(first.is_new);

        let mut changed = fields("https://x.example/1", None);
        changed.headline = "A different headline".into();
        let second = upsert_article(&mut conn, &changed).await.expect("second upsert");
        assert_eq!(second, UpsertOutcome { id: first.id, is_new: false });

        drop(conn);
        assert_eq!(count_articles(&pool).await.expect("count"), 1);
        let stored = find_article_by_url(&pool, "https://x.example/1")
            .await
            .expect("query")
            .expect("row");
        assert_eq!(stored.headline, "Senate passes the new budget bill");
        assert_eq!(stored.entities.len(), 1);
        assert_eq!(stored.sentiment_label.as_deref(), Some("NEU"));
    }

    #[tokio::test]
    async fn test_story_id_backfilled_only_when_unset() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.expect("connection");
        let url = "https://x.example/story";

        upsert_article(&mut conn, &fields(url, None)).await.expect("insert");
        upsert_article(&mut conn, &fields(url, Some(3))).await.expect("backfill");
        upsert_article(&mut conn, &fields(url, Some(7))).await.expect("no overwrite");
        drop(conn);

        let stored = find_article_by_url(&pool, url).await.expect("query").expect("row");
        assert_eq!(stored.story_id, Some(3));
    }

    #[tokio::test]
    async fn test_concurrent_upserts_create_one_row() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let pool = crate::storage::init_db_pool(&dir.path().join("race.db"), 8)
            .await
            .expect("pool");
        crate::storage::run_migrations(&pool).await.expect("migrations");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let mut conn = pool.acquire().await.expect("connection");
                upsert_article(&mut conn, &fields("https://x.example/race", None))
                    .await
                    .expect("upsert")
            }));
        }
        let mut new_count = 0;
        for handle in handles {
            if handle.await.expect("join").is_new {
                new_count += 1;
            }
        }
        assert_eq!(new_count, 1);
        assert_eq!(count_articles(&pool).await.expect("count"), 1);
    }
}
