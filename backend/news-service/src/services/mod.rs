/// Business logic layer for news-service
///
/// This module provides high-level operations:
/// - Comment service: submission rules and publishing of reader comments
/// - Post service: the article page with sidebars and the comment tree
/// - Comment tree: nesting of approved comments into reply threads
/// - Presenters: article view models and link rewriting
pub mod comment_tree;
pub mod comments;
pub mod posts;
pub mod presenters;

// Re-export commonly used services
pub use comment_tree::{build_comment_tree, MAX_REPLY_DEPTH};
pub use comments::{CommentService, CreateCommentRequest, SubmissionContext};
pub use posts::{PostPage, PostService};
pub use presenters::{ArticleSummary, ContentRewriter};
