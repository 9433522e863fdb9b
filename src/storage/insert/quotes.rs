//! Quote insertion.

use sqlx::{Connection, SqliteConnection};

use crate::analysis::Quote;
use crate::error_handling::DatabaseError;

/// Appends `quotes` to `article_id` in one transaction and returns how many
/// rows were written. Quotes are not deduplicated.
pub async fn insert_quotes(
    conn: &mut SqliteConnection,
    article_id: i64,
    quotes: &[Quote],
) -> Result<usize, DatabaseError> {
    if quotes.is_empty() {
        return Ok(0);
    }
    let mut tx = conn.begin().await?;
    for quote in quotes {
        let person = Some(quote.person.as_str()).filter(|p| !p.trim().is_empty());
        sqlx::query("INSERT INTO quotes (article_id, quote_text, quoted_person) VALUES (?, ?, ?)")
            .bind(article_id)
            .bind(&quote.text)
            .bind(person)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(quotes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{create_test_article, create_test_pool};
    use crate::storage::quotes_for_article;

    #[tokio::test]
    async fn test_quotes_attach_to_article() {
        let pool = create_test_pool().await;
        let article_id = create_test_article(&pool, "https://x.example/q").await;
        let quotes = vec![
            Quote {
                text: "We will not raise taxes this year".into(),
                person: "Minister Gómez".into(),
            },
            Quote {
                text: "We will not raise taxes this year".into(),
                person: String::new(),
            },
        ];

        let mut conn = pool.acquire().await.expect("connection");
        let written = insert_quotes(&mut conn, article_id, &quotes).await.expect("insert");
        drop(conn);
        assert_eq!(written, 2);

        let stored = quotes_for_article(&pool, article_id).await.expect("query");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].quoted_person.as_deref(), Some("Minister Gómez"));
        assert_eq!(stored[1].quoted_person, None);
    }

    #[tokio::test]
    async fn test_unknown_article_is_rejected() {
        let pool = create_test_pool().await;
        let mut conn = pool.acquire().await.expect("connection");
        let quote = Quote {
            text: "Nobody said this".into(),
            person: "Nobody".into(),
        };
        assert!(insert_quotes(&mut conn, 999, &[quote]).await.is_err());
    }
}
