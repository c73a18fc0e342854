use chrono::NaiveDateTime;
use serde::Serialize;

/// `comment_approved` value WordPress uses for visible comments.
pub const APPROVED_FLAG: &str = "1";
/// `comment_approved` value for comments held back.
pub const PENDING_FLAG: &str = "0";

/// Shown when a stored comment has no author name.
pub const FALLBACK_READER_NAME: &str = "Leitor";

const COMMENT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Raw `comments` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub comment_id: i64,
    pub comment_post_id: i64,
    pub comment_parent: i64,
    pub comment_author: String,
    pub comment_author_email: String,
    pub comment_author_ip: String,
    pub comment_date: NaiveDateTime,
    pub comment_date_gmt: NaiveDateTime,
    pub comment_content: String,
    pub comment_approved: String,
    pub user_id: i64,
}

/// A comment on an article. `parent_id` is `None` for root comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub parent_id: Option<i64>,
    pub author_name: String,
    pub author_email: String,
    pub author_ip: String,
    /// Site-local creation time
    pub created_at: NaiveDateTime,
    pub created_at_gmt: NaiveDateTime,
    pub content: String,
    pub approved: bool,
    pub user_id: i64,
}

impl Comment {
    /// Parent id with WordPress' `0` sentinel folded into `None`.
    pub fn parent(&self) -> Option<i64> {
        self.parent_id.filter(|id| *id != 0)
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.comment_id,
            article_id: row.comment_post_id,
            parent_id: Some(row.comment_parent).filter(|id| *id != 0),
            author_name: row.comment_author,
            author_email: row.comment_author_email,
            author_ip: row.comment_author_ip,
            created_at: row.comment_date,
            created_at_gmt: row.comment_date_gmt,
            content: row.comment_content,
            approved: row.comment_approved == APPROVED_FLAG,
            user_id: row.user_id,
        }
    }
}

/// Everything needed to insert a comment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub article_id: i64,
    pub parent_id: Option<i64>,
    pub author_name: String,
    pub author_email: String,
    pub author_url: String,
    pub author_ip: String,
    pub user_agent: String,
    pub created_at: NaiveDateTime,
    pub created_at_gmt: NaiveDateTime,
    pub content: String,
    pub approved: bool,
    pub comment_type: String,
    pub user_id: i64,
}

impl NewComment {
    /// Value stored in `comment_parent`.
    pub fn parent_column(&self) -> i64 {
        self.parent_id.unwrap_or(0)
    }

    /// Value stored in `comment_approved`.
    pub fn approved_column(&self) -> &'static str {
        if self.approved {
            APPROVED_FLAG
        } else {
            PENDING_FLAG
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAuthor {
    pub name: String,
}

/// One node of the reply tree handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentTreeNode {
    pub id: i64,
    pub content: String,
    pub date: String,
    pub author: CommentAuthor,
    pub replies: Vec<CommentTreeNode>,
}

impl CommentTreeNode {
    pub fn new(comment: &Comment, replies: Vec<CommentTreeNode>) -> Self {
        let name = if comment.author_name.is_empty() {
            FALLBACK_READER_NAME.to_string()
        } else {
            comment.author_name.clone()
        };

        Self {
            id: comment.id,
            content: comment.content.clone(),
            date: comment.created_at.format(COMMENT_DATE_FORMAT).to_string(),
            author: CommentAuthor { name },
            replies,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        let mut size = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            size += 1;
            pending.extend(node.replies.iter());
        }
        size
    }

    /// Deepest reply level below this node; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.replies.iter().map(|reply| (reply, level + 1)));
        }
        deepest
    }
}

impl Drop for CommentTreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}
