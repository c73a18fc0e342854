/// Comment service - validates and publishes reader comments
///
/// Submission runs in a fixed order: the caller must be signed in, then the
/// field shapes are checked, then the referenced article and parent comment
/// are looked up. Nothing is written unless every check passes.
use crate::db::{ArticleLookup, CommentStore};
use crate::error::{AppError, FieldErrors, Result};
use crate::metrics::news::COMMENT_SUBMISSIONS_TOTAL;
use crate::models::{AuthenticatedUser, Comment, NewComment};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// Longest accepted comment body, in characters.
pub const MAX_COMMENT_LENGTH: u64 = 2000;
/// Stored user agents are cut to this many characters.
pub const MAX_USER_AGENT_LENGTH: usize = 255;

pub const AUTH_REQUIRED_MESSAGE: &str = "Autenticacao obrigatoria.";
pub const COMMENT_PUBLISHED_MESSAGE: &str = "Comentario publicado com sucesso.";

/// Raw submission body. Fields stay untyped until validation so that a wrong
/// type becomes a field error instead of a rejected body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default, alias = "post_id")]
    pub article_id: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub parent_id: Option<Value>,
}

#[derive(Debug, Validate)]
struct CommentDraft {
    #[validate(required(message = "The article id field is required."))]
    article_id: Option<i64>,
    #[validate(
        required(message = "The content field is required."),
        length(max = 2000, message = "The content field must not be greater than 2000 characters.")
    )]
    content: Option<String>,
    parent_id: Option<i64>,
}

impl CommentDraft {
    /// Coerce the raw body, recording shape errors for fields that cannot be
    /// read as their declared type.
    fn read(request: CreateCommentRequest, errors: &mut FieldErrors) -> Self {
        let article_id = match integer_field(request.article_id) {
            Ok(value) => value,
            Err(()) => {
                errors.add("article_id", "The article id field must be an integer.");
                None
            }
        };

        let parent_id = match integer_field(request.parent_id) {
            Ok(value) => value,
            Err(()) => {
                errors.add("parent_id", "The parent id field must be an integer.");
                None
            }
        };

        // Only the empty string counts as missing; blank text is stored as sent.
        let content = match request.content {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) if text.is_empty() => None,
            Some(Value::String(text)) => Some(text),
            Some(_) => {
                errors.add("content", "The content field must be a string.");
                None
            }
        };

        Self {
            article_id,
            content,
            parent_id,
        }
    }
}

/// Accepts JSON integers and integer strings. Empty strings count as absent.
fn integer_field(value: Option<Value>) -> std::result::Result<Option<i64>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_i64().map(Some).ok_or(()),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => text.trim().parse::<i64>().map(Some).map_err(|_| ()),
        Some(_) => Err(()),
    }
}

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment {
    pub article_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
}

/// Request facts recorded alongside the comment.
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionContext {
    pub fn now(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip,
            user_agent,
            submitted_at: Utc::now(),
        }
    }
}

pub struct CommentService {
    articles: Arc<dyn ArticleLookup>,
    comments: Arc<dyn CommentStore>,
    local_offset: FixedOffset,
}

impl CommentService {
    pub fn new(
        articles: Arc<dyn ArticleLookup>,
        comments: Arc<dyn CommentStore>,
        local_offset: FixedOffset,
    ) -> Self {
        Self {
            articles,
            comments,
            local_offset,
        }
    }

    /// Validate a submission and store it as an approved comment.
    pub async fn submit(
        &self,
        user: Option<&AuthenticatedUser>,
        request: CreateCommentRequest,
        context: SubmissionContext,
    ) -> Result<Comment> {
        let Some(user) = user else {
            COMMENT_SUBMISSIONS_TOTAL
                .with_label_values(&["forbidden"])
                .inc();
            return Err(AppError::Forbidden(AUTH_REQUIRED_MESSAGE.to_string()));
        };

        let validated = match self.validate(request).await {
            Ok(validated) => validated,
            Err(err) => {
                let outcome = match err {
                    AppError::Validation(_) => "invalid",
                    _ => "error",
                };
                COMMENT_SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();
                return Err(err);
            }
        };

        let new_comment = self.prepare(user, validated, &context);
        let comment = match self.comments.insert(&new_comment).await {
            Ok(comment) => comment,
            Err(err) => {
                COMMENT_SUBMISSIONS_TOTAL.with_label_values(&["error"]).inc();
                return Err(err);
            }
        };

        COMMENT_SUBMISSIONS_TOTAL
            .with_label_values(&["published"])
            .inc();
        tracing::info!(
            comment_id = comment.id,
            article_id = comment.article_id,
            parent_id = ?comment.parent_id,
            user_id = user.id,
            "comment published"
        );

        Ok(comment)
    }

    /// Run the field rules and the store lookups, collecting every failure.
    pub async fn validate(&self, request: CreateCommentRequest) -> Result<ValidatedComment> {
        let mut errors = FieldErrors::new();
        let draft = CommentDraft::read(request, &mut errors);
        if let Err(rules) = draft.validate() {
            errors.absorb(FieldErrors::from(&rules));
        }

        if let (Some(article_id), false) = (draft.article_id, errors.contains("article_id")) {
            if !self.articles.article_exists(article_id).await? {
                errors.add("article_id", "The selected article id is invalid.");
            }
        }

        if let (Some(parent_id), false) = (draft.parent_id, errors.contains("parent_id")) {
            let parent = self.comments.find_comment(parent_id).await?;
            let same_article = matches!(
                (parent, draft.article_id),
                (Some(parent), Some(article_id)) if parent.article_id == article_id
            );
            if !same_article {
                errors.add("parent_id", "The selected parent id is invalid.");
            }
        }

        if !errors.is_empty() {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "comment rejected");
        }
        errors.into_result()?;

        match (draft.article_id, draft.content) {
            (Some(article_id), Some(content)) => Ok(ValidatedComment {
                article_id,
                content,
                parent_id: draft.parent_id,
            }),
            _ => Err(AppError::Internal(
                "validated comment is missing required fields".to_string(),
            )),
        }
    }

    fn prepare(
        &self,
        user: &AuthenticatedUser,
        validated: ValidatedComment,
        context: &SubmissionContext,
    ) -> NewComment {
        let user_agent = context
            .user_agent
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(MAX_USER_AGENT_LENGTH)
            .collect();

        NewComment {
            article_id: validated.article_id,
            parent_id: validated.parent_id,
            author_name: user.display_name().to_string(),
            author_email: user.contact_email().to_string(),
            author_url: String::new(),
            author_ip: context.ip.clone().unwrap_or_default(),
            user_agent,
            created_at: context
                .submitted_at
                .with_timezone(&self.local_offset)
                .naive_local(),
            created_at_gmt: context.submitted_at.naive_utc(),
            content: validated.content,
            approved: true,
            comment_type: String::new(),
            user_id: user.id,
        }
    }
}
