//! In-memory ArticleLookup and CommentStore for HTTP-level tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use news_service::db::{ArticleLookup, CommentStore};
use news_service::models::{Article, Comment, NewComment, PostStatus};
use news_service::Result;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    articles: Vec<Article>,
    comments: Vec<Comment>,
    inserted: Vec<NewComment>,
}

/// Clones share the same state, so a test can keep a handle after handing
/// the store to the app.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, day)
        .expect("valid date")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

pub fn article(id: i64, slug: &str, status: PostStatus) -> Article {
    Article {
        id,
        title: format!("Artigo {}", id),
        excerpt: format!("Resumo {}", id),
        body: r#"<p><a href="/tag/mocambique">Mocambique</a></p>"#.to_string(),
        status,
        post_type: "post".to_string(),
        slug: slug.to_string(),
        published_at: at(id as u32 % 28 + 1, 9),
        published_at_gmt: at(id as u32 % 28 + 1, 7),
        author_id: 1,
        author_name: Some("Redator".to_string()),
        comment_count: id,
        thumbnail: None,
    }
}

pub fn comment(id: i64, article_id: i64, parent_id: Option<i64>, hour: u32) -> Comment {
    Comment {
        id,
        article_id,
        parent_id,
        author_name: format!("Leitor {}", id),
        author_email: String::new(),
        author_ip: String::new(),
        created_at: at(1, hour),
        created_at_gmt: at(1, hour),
        content: format!("Comentario {}", id),
        approved: true,
        user_id: 0,
    }
}

impl MemoryStore {
    pub fn with_article(self, article: Article) -> Self {
        self.state.lock().unwrap().articles.push(article);
        self
    }

    pub fn with_comment(self, comment: Comment) -> Self {
        self.state.lock().unwrap().comments.push(comment);
        self
    }

    pub fn inserted(&self) -> Vec<NewComment> {
        self.state.lock().unwrap().inserted.clone()
    }

    fn published_except(&self, exclude_id: i64) -> Vec<Article> {
        self.state
            .lock()
            .unwrap()
            .articles
            .iter()
            .filter(|a| a.is_visible() && a.id != exclude_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ArticleLookup for MemoryStore {
    async fn find_published(&self, id_or_slug: &str) -> Result<Option<Article>> {
        let numeric = id_or_slug.parse::<i64>().ok();
        let state = self.state.lock().unwrap();
        let mut visible = state.articles.iter().filter(|a| a.is_visible());

        let found = match numeric {
            Some(id) => visible.find(|a| a.id == id || a.slug == id_or_slug),
            None => visible.find(|a| a.slug == id_or_slug),
        };
        Ok(found.cloned())
    }

    async fn article_exists(&self, article_id: i64) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .articles
            .iter()
            .any(|a| a.id == article_id))
    }

    async fn approved_comments(&self, article_id: i64) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state
            .lock()
            .unwrap()
            .comments
            .iter()
            .filter(|c| c.article_id == article_id && c.approved)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn recent(&self, exclude_id: i64, limit: i64) -> Result<Vec<Article>> {
        let mut articles = self.published_except(exclude_id);
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit as usize);
        Ok(articles)
    }

    async fn trending(&self, exclude_id: i64, limit: i64) -> Result<Vec<Article>> {
        let mut articles = self.published_except(exclude_id);
        articles.sort_by(|a, b| {
            b.comment_count
                .cmp(&a.comment_count)
                .then_with(|| b.published_at.cmp(&a.published_at))
        });
        articles.truncate(limit as usize);
        Ok(articles)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned())
    }

    async fn insert(&self, new_comment: &NewComment) -> Result<Comment> {
        let mut state = self.state.lock().unwrap();
        let id = state.comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let stored = Comment {
            id,
            article_id: new_comment.article_id,
            parent_id: new_comment.parent_id,
            author_name: new_comment.author_name.clone(),
            author_email: new_comment.author_email.clone(),
            author_ip: new_comment.author_ip.clone(),
            created_at: new_comment.created_at,
            created_at_gmt: new_comment.created_at_gmt,
            content: new_comment.content.clone(),
            approved: new_comment.approved,
            user_id: new_comment.user_id,
        };
        state.comments.push(stored.clone());
        state.inserted.push(new_comment.clone());
        Ok(stored)
    }
}
