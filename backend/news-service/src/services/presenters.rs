/// View-model shaping for articles
///
/// Converts `Article` records into the props the client-side pages expect,
/// including the display fallbacks and the rewriting of root-relative links
/// inside article bodies.
use crate::models::Article;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

/// Author shown on article cards when the post has none.
pub const FALLBACK_CARD_AUTHOR: &str = "Redacao";
/// Author shown on the article page when the post has none.
pub const FALLBACK_DETAIL_AUTHOR: &str = "Autor Desconhecido";

const ARTICLE_DATE_FORMAT: &str = "%d/%m/%Y";

lazy_static! {
    static ref RELATIVE_LINK: Regex =
        Regex::new(r#"(src|href)=["']/([^"']*)["']"#).expect("invalid relative link pattern");
}

/// Article as shown on cards and sidebars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub author: String,
    pub thumbnail: Option<String>,
    pub slug: String,
    pub views: i64,
}

impl ArticleSummary {
    pub fn from_article(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            excerpt: article.excerpt.clone(),
            content: article.body.clone(),
            date: article.published_at.format(ARTICLE_DATE_FORMAT).to_string(),
            author: article
                .author_name
                .clone()
                .unwrap_or_else(|| FALLBACK_CARD_AUTHOR.to_string()),
            thumbnail: article.thumbnail.clone(),
            slug: article.slug.clone(),
            views: article.comment_count,
        }
    }
}

/// Rewrites `src="/..."` and `href='/...'` attributes to absolute URLs.
#[derive(Debug, Clone)]
pub struct ContentRewriter {
    site_url: String,
}

impl ContentRewriter {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn rewrite(&self, content: &str) -> String {
        RELATIVE_LINK
            .replace_all(content, |caps: &Captures| {
                format!("{}=\"{}/{}\"", &caps[1], self.site_url, &caps[2])
            })
            .into_owned()
    }

    /// Article page variant of [`ArticleSummary`].
    pub fn detail(&self, article: &Article) -> ArticleSummary {
        let mut summary = ArticleSummary::from_article(article);
        summary.content = self.rewrite(&article.body);
        summary.author = article
            .author_name
            .clone()
            .unwrap_or_else(|| FALLBACK_DETAIL_AUTHOR.to_string());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostStatus;
    use chrono::NaiveDate;

    fn article(author: Option<&str>) -> Article {
        let date = NaiveDate::from_ymd_opt(2024, 7, 25)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        Article {
            id: 42,
            title: "Chuvas em Maputo".into(),
            excerpt: "Resumo".into(),
            body: r#"<img src="/wp-content/a.jpg"><a href='/categoria/x'>x</a>"#.into(),
            status: PostStatus::Publish,
            post_type: "post".into(),
            slug: "chuvas-em-maputo".into(),
            published_at: date,
            published_at_gmt: date,
            author_id: 1,
            author_name: author.map(str::to_string),
            comment_count: 12,
            thumbnail: None,
        }
    }

    #[test]
    fn test_summary_fields() {
        let summary = ArticleSummary::from_article(&article(None));
        assert_eq!(summary.date, "25/07/2024");
        assert_eq!(summary.author, "Redacao");
        assert_eq!(summary.views, 12);
        assert_eq!(summary.slug, "chuvas-em-maputo");
    }

    #[test]
    fn test_relative_links_become_absolute() {
        let rewriter = ContentRewriter::new("http://noticias.co.mz/");
        let rewritten = rewriter.rewrite(&article(None).body);
        assert_eq!(
            rewritten,
            r#"<img src="http://noticias.co.mz/wp-content/a.jpg"><a href="http://noticias.co.mz/categoria/x">x</a>"#
        );
    }

    #[test]
    fn test_absolute_and_path_relative_links_untouched() {
        let rewriter = ContentRewriter::new("http://noticias.co.mz");
        let html = r#"<a href="https://example.org/a">a</a><img src="img/b.png">"#;
        assert_eq!(rewriter.rewrite(html), html);
    }

    #[test]
    fn test_detail_uses_page_fallback_author() {
        let rewriter = ContentRewriter::new("http://noticias.co.mz");
        assert_eq!(rewriter.detail(&article(None)).author, "Autor Desconhecido");
        assert_eq!(rewriter.detail(&article(Some("Ana"))).author, "Ana");
    }
}
