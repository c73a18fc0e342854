/// Database access layer
///
/// This module provides:
/// - Postgres connection pool creation and embedded migrations
/// - `ArticleLookup` and `CommentStore`, the seams the services depend on
/// - Postgres implementations of both over the WordPress-shaped schema
pub mod article_repo;
pub mod comment_repo;

pub use article_repo::PgArticleRepository;
pub use comment_repo::PgCommentStore;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{Article, Comment, NewComment};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Read access to articles and their approved comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleLookup: Send + Sync {
    /// Published article whose id or slug equals `id_or_slug`.
    async fn find_published(&self, id_or_slug: &str) -> Result<Option<Article>>;

    /// Whether any `posts` row has this id, whatever its status.
    async fn article_exists(&self, article_id: i64) -> Result<bool>;

    /// Approved comments of an article, oldest first.
    async fn approved_comments(&self, article_id: i64) -> Result<Vec<Comment>>;

    /// Newest published articles other than `exclude_id`.
    async fn recent(&self, exclude_id: i64, limit: i64) -> Result<Vec<Article>>;

    /// Most commented published articles other than `exclude_id`.
    async fn trending(&self, exclude_id: i64, limit: i64) -> Result<Vec<Article>>;
}

/// Write access to comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Any comment with this id, approved or not.
    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>>;

    /// Insert one row and return it as stored.
    async fn insert(&self, comment: &NewComment) -> Result<Comment>;
}

/// Create the Postgres pool described by `config`.
pub async fn create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_lazy(&config.url)?;

    tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    .map_err(|_| sqlx::Error::PoolTimedOut)??;

    tracing::info!("database pool ready");
    Ok(pool)
}

/// Apply the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
