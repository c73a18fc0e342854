use super::CommentStore;
use crate::error::Result;
use crate::models::{Comment, CommentRow, NewComment};
use async_trait::async_trait;
use sqlx::PgPool;

/// Postgres-backed comment store
#[derive(Clone)]
pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, comment_post_id, comment_parent, comment_author,
                   comment_author_email, comment_author_ip, comment_date, comment_date_gmt,
                   comment_content, comment_approved, user_id
            FROM comments
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Comment::from))
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (
                comment_post_id, comment_author, comment_author_email, comment_author_url,
                comment_author_ip, comment_date, comment_date_gmt, comment_content,
                comment_approved, comment_agent, comment_type, comment_parent, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING comment_id, comment_post_id, comment_parent, comment_author,
                      comment_author_email, comment_author_ip, comment_date, comment_date_gmt,
                      comment_content, comment_approved, user_id
            "#,
        )
        .bind(comment.article_id)
        .bind(&comment.author_name)
        .bind(&comment.author_email)
        .bind(&comment.author_url)
        .bind(&comment.author_ip)
        .bind(comment.created_at)
        .bind(comment.created_at_gmt)
        .bind(&comment.content)
        .bind(comment.approved_column())
        .bind(&comment.user_agent)
        .bind(&comment.comment_type)
        .bind(comment.parent_column())
        .bind(comment.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Comment::from(row))
    }
}
