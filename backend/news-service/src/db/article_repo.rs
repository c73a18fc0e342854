use super::ArticleLookup;
use crate::error::Result;
use crate::models::{Article, ArticleRow, Comment, CommentRow};
use async_trait::async_trait;
use sqlx::PgPool;

/// Columns selected for every article query. The featured image comes from the
/// `_thumbnail_id` post meta pointing at an attachment post.
const ARTICLE_SELECT: &str = r#"
    SELECT p.id, p.post_title, p.post_excerpt, p.post_content, p.post_status, p.post_type,
           p.post_name, p.post_date, p.post_date_gmt, p.post_author, p.comment_count,
           u.display_name AS author_name,
           (
               SELECT att.guid
               FROM postmeta pm
               JOIN posts att ON att.id::text = pm.meta_value AND att.post_type = 'attachment'
               WHERE pm.post_id = p.id AND pm.meta_key = '_thumbnail_id'
               LIMIT 1
           ) AS thumbnail
    FROM posts p
    LEFT JOIN users u ON u.id = p.post_author
"#;

const PUBLISHED: &str = "p.post_status = 'publish' AND p.post_type = 'post'";

/// Postgres-backed article lookup
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn published_excluding(
        &self,
        exclude_id: i64,
        limit: i64,
        order_by: &str,
    ) -> Result<Vec<Article>> {
        let query = format!(
            "{ARTICLE_SELECT} WHERE {PUBLISHED} AND p.id <> $1 ORDER BY {order_by} LIMIT $2"
        );

        let rows = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(exclude_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }
}

#[async_trait]
impl ArticleLookup for PgArticleRepository {
    async fn find_published(&self, id_or_slug: &str) -> Result<Option<Article>> {
        let numeric_id = id_or_slug.parse::<i64>().ok();
        let query = format!(
            "{ARTICLE_SELECT} WHERE {PUBLISHED} AND (p.id = $1 OR p.post_name = $2) \
             ORDER BY (p.id = $1) DESC NULLS LAST, p.id LIMIT 1"
        );

        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(numeric_id)
            .bind(id_or_slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Article::from))
    }

    async fn article_exists(&self, article_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(article_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn approved_comments(&self, article_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, comment_post_id, comment_parent, comment_author,
                   comment_author_email, comment_author_ip, comment_date, comment_date_gmt,
                   comment_content, comment_approved, user_id
            FROM comments
            WHERE comment_post_id = $1 AND comment_approved = '1'
            ORDER BY comment_date ASC, comment_id ASC
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn recent(&self, exclude_id: i64, limit: i64) -> Result<Vec<Article>> {
        self.published_excluding(exclude_id, limit, "p.post_date DESC")
            .await
    }

    async fn trending(&self, exclude_id: i64, limit: i64) -> Result<Vec<Article>> {
        self.published_excluding(exclude_id, limit, "p.comment_count DESC, p.post_date DESC")
            .await
    }
}
