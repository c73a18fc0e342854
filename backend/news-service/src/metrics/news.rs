use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Histogram, IntCounterVec,
};

lazy_static! {
    /// Comment submissions by outcome (published, forbidden, invalid, error).
    pub static ref COMMENT_SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "comment_submissions_total",
        "Comment submissions segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register comment_submissions_total");

    /// Number of comments placed in each built reply tree.
    pub static ref COMMENT_TREE_SIZE: Histogram = register_histogram!(
        "comment_tree_size",
        "Comments emitted per article comment tree",
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]
    )
    .expect("failed to register comment_tree_size");

    /// Article page lookups by outcome (found, not_found, error).
    pub static ref ARTICLE_PAGE_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "article_page_requests_total",
        "Article page lookups segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register article_page_requests_total");
}
