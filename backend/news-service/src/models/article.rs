use chrono::NaiveDateTime;

/// Value of `post_type` for regular news articles.
pub const ARTICLE_POST_TYPE: &str = "post";

/// WordPress `post_status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStatus {
    Publish,
    Draft,
    Other(String),
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for PostStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "publish" => PostStatus::Publish,
            "draft" => PostStatus::Draft,
            other => PostStatus::Other(other.to_string()),
        }
    }
}

/// Raw `posts` row joined with the author's display name and featured image.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub post_title: String,
    pub post_excerpt: String,
    pub post_content: String,
    pub post_status: String,
    pub post_type: String,
    pub post_name: String,
    pub post_date: NaiveDateTime,
    pub post_date_gmt: NaiveDateTime,
    pub post_author: i64,
    pub comment_count: i64,
    pub author_name: Option<String>,
    pub thumbnail: Option<String>,
}

/// A news article.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub status: PostStatus,
    pub post_type: String,
    pub slug: String,
    pub published_at: NaiveDateTime,
    pub published_at_gmt: NaiveDateTime,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub comment_count: i64,
    pub thumbnail: Option<String>,
}

impl Article {
    /// Readers only ever see published articles of type `post`.
    pub fn is_visible(&self) -> bool {
        self.status == PostStatus::Publish && self.post_type == ARTICLE_POST_TYPE
    }
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.post_title,
            excerpt: row.post_excerpt,
            body: row.post_content,
            status: PostStatus::from(row.post_status.as_str()),
            post_type: row.post_type,
            slug: row.post_name,
            published_at: row.post_date,
            published_at_gmt: row.post_date_gmt,
            author_id: row.post_author,
            author_name: row.author_name.filter(|name| !name.trim().is_empty()),
            comment_count: row.comment_count,
            thumbnail: row.thumbnail.filter(|url| !url.is_empty()),
        }
    }
}
