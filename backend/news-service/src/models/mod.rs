/// Data models for news-service
///
/// This module defines structures for:
/// - Article: WordPress posts as readers see them
/// - Comment: flat comment records and the nested tree built from them
/// - AuthenticatedUser: the identity attached to a request, if any
pub mod article;
pub mod comment;
pub mod user;

pub use article::{Article, ArticleRow, PostStatus};
pub use comment::{Comment, CommentAuthor, CommentRow, CommentTreeNode, NewComment};
pub use user::AuthenticatedUser;
