/// News Service Library
///
/// Serves the public article page of the news portal and accepts reader
/// comments on articles stored in a WordPress-shaped Postgres schema.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Articles, comments and the reader identity
/// - `services`: Comment submission, article page and comment tree
/// - `db`: Store traits and their Postgres implementations
/// - `middleware`: Optional bearer token identity
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
