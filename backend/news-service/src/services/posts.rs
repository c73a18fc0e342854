/// Post service - composes the article page
use crate::db::ArticleLookup;
use crate::error::{AppError, Result};
use crate::metrics::news::{ARTICLE_PAGE_REQUESTS_TOTAL, COMMENT_TREE_SIZE};
use crate::models::CommentTreeNode;
use crate::services::comment_tree::build_comment_tree;
use crate::services::presenters::{ArticleSummary, ContentRewriter};
use serde::Serialize;
use std::sync::Arc;

/// Articles shown in each sidebar.
pub const SIDEBAR_LIMIT: i64 = 5;

/// Props of the article page.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub post: ArticleSummary,
    pub recent: Vec<ArticleSummary>,
    pub trending: Vec<ArticleSummary>,
    pub comments: Vec<CommentTreeNode>,
    pub can_comment: bool,
}

pub struct PostService {
    articles: Arc<dyn ArticleLookup>,
    rewriter: ContentRewriter,
}

impl PostService {
    pub fn new(articles: Arc<dyn ArticleLookup>, rewriter: ContentRewriter) -> Self {
        Self { articles, rewriter }
    }

    /// Load a published article by id or slug with its sidebars and comment tree.
    pub async fn show(&self, id_or_slug: &str, can_comment: bool) -> Result<PostPage> {
        let article = match self.articles.find_published(id_or_slug).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                ARTICLE_PAGE_REQUESTS_TOTAL
                    .with_label_values(&["not_found"])
                    .inc();
                return Err(AppError::NotFound(format!("post {}", id_or_slug)));
            }
            Err(err) => {
                ARTICLE_PAGE_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                return Err(err);
            }
        };

        let loaded = futures::try_join!(
            self.articles.approved_comments(article.id),
            self.articles.recent(article.id, SIDEBAR_LIMIT),
            self.articles.trending(article.id, SIDEBAR_LIMIT),
        );
        let (comments, recent, trending) = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                ARTICLE_PAGE_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                return Err(err);
            }
        };

        let tree = build_comment_tree(&comments);
        let emitted: usize = tree.iter().map(CommentTreeNode::subtree_size).sum();
        COMMENT_TREE_SIZE.observe(emitted as f64);
        if emitted < comments.len() {
            tracing::warn!(
                article_id = article.id,
                approved = comments.len(),
                emitted,
                "comments left out of the reply tree"
            );
        }

        ARTICLE_PAGE_REQUESTS_TOTAL.with_label_values(&["found"]).inc();
        tracing::debug!(article_id = article.id, comments = emitted, "article page loaded");

        Ok(PostPage {
            post: self.rewriter.detail(&article),
            recent: recent.iter().map(ArticleSummary::from_article).collect(),
            trending: trending.iter().map(ArticleSummary::from_article).collect(),
            comments: tree,
            can_comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockArticleLookup;
    use crate::models::{Article, Comment, PostStatus};
    use crate::services::comment_tree::MAX_REPLY_DEPTH;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn article(id: i64, slug: &str) -> Article {
        Article {
            id,
            title: format!("Artigo {}", id),
            excerpt: String::new(),
            body: r#"<img src="/wp-content/uploads/capa.jpg">"#.into(),
            status: PostStatus::Publish,
            post_type: "post".into(),
            slug: slug.into(),
            published_at: at(8),
            published_at_gmt: at(6),
            author_id: 1,
            author_name: None,
            comment_count: 0,
            thumbnail: None,
        }
    }

    fn comment(id: i64, parent_id: Option<i64>, hour: u32) -> Comment {
        Comment {
            id,
            article_id: 1,
            parent_id,
            author_name: String::new(),
            author_email: String::new(),
            author_ip: String::new(),
            created_at: at(hour),
            created_at_gmt: at(hour),
            content: format!("c{}", id),
            approved: true,
            user_id: 0,
        }
    }

    fn service(articles: MockArticleLookup) -> PostService {
        PostService::new(Arc::new(articles), ContentRewriter::new("http://noticias.co.mz"))
    }

    #[tokio::test]
    async fn test_page_props_are_composed() {
        let mut articles = MockArticleLookup::new();
        articles
            .expect_find_published()
            .withf(|key: &str| key == "chuvas")
            .returning(|_| Ok(Some(article(1, "chuvas"))));
        articles.expect_approved_comments().returning(|_| {
            Ok(vec![
                comment(1, None, 9),
                comment(2, None, 10),
                comment(3, Some(1), 11),
                comment(4, Some(3), 12),
            ])
        });
        articles
            .expect_recent()
            .withf(|exclude, limit| *exclude == 1 && *limit == SIDEBAR_LIMIT)
            .returning(|_, _| Ok(vec![article(2, "b"), article(3, "c")]));
        articles
            .expect_trending()
            .withf(|exclude, limit| *exclude == 1 && *limit == SIDEBAR_LIMIT)
            .returning(|_, _| Ok(vec![article(4, "d")]));

        let page = service(articles).show("chuvas", true).await.unwrap();

        assert!(page.can_comment);
        assert_eq!(page.post.author, "Autor Desconhecido");
        assert_eq!(
            page.post.content,
            r#"<img src="http://noticias.co.mz/wp-content/uploads/capa.jpg">"#
        );
        assert_eq!(page.recent.len(), 2);
        assert_eq!(page.recent[0].author, "Redacao");
        assert_eq!(page.trending.len(), 1);

        assert_eq!(page.comments.len(), 2);
        assert_eq!(page.comments[0].id, 1);
        assert_eq!(page.comments[0].author.name, "Leitor");
        assert_eq!(page.comments[0].replies[0].id, 3);
        assert_eq!(page.comments[0].replies[0].replies[0].id, 4);
        assert!(page.comments[1].replies.is_empty());
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let mut articles = MockArticleLookup::new();
        articles.expect_find_published().returning(|_| Ok(None));
        articles.expect_approved_comments().never();

        let err = service(articles).show("nada", false).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut articles = MockArticleLookup::new();
        articles
            .expect_find_published()
            .returning(|_| Ok(Some(article(1, "a"))));
        articles
            .expect_approved_comments()
            .returning(|_| Err(AppError::Database("connection reset".into())));
        articles.expect_recent().returning(|_, _| Ok(vec![]));
        articles.expect_trending().returning(|_, _| Ok(vec![]));

        let err = service(articles).show("1", false).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_long_reply_chain_renders_and_serializes() {
        let length: i64 = 25_000;
        let mut articles = MockArticleLookup::new();
        articles
            .expect_find_published()
            .returning(|_| Ok(Some(article(1, "debate"))));
        articles.expect_approved_comments().returning(move |_| {
            Ok((1..=length)
                .map(|id| comment(id, if id == 1 { None } else { Some(id - 1) }, 9))
                .collect())
        });
        articles.expect_recent().returning(|_, _| Ok(vec![]));
        articles.expect_trending().returning(|_, _| Ok(vec![]));

        let page = service(articles).show("debate", true).await.unwrap();

        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].subtree_size(), length as usize);
        assert!(page.comments[0].depth() <= MAX_REPLY_DEPTH);

        let json = serde_json::to_vec(&page).unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded["comments"][0]["id"], 1);
    }
}
