#![allow(dead_code)]

pub mod memory_store;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use chrono::FixedOffset;
use jsonwebtoken::{encode, EncodingKey, Header};
use memory_store::MemoryStore;
use news_service::handlers;
use news_service::middleware::{Claims, JwtVerifier};
use news_service::services::{CommentService, ContentRewriter, PostService};
use std::sync::Arc;

pub const TEST_SECRET: &str = "news-service-test-secret";
pub const SITE_URL: &str = "http://noticias.co.mz";

/// Signed `Authorization` header for `user_id`.
pub fn bearer(user_id: i64, name: Option<&str>, email: Option<&str>) -> (String, String) {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        name: name.map(str::to_string),
        email: email.map(str::to_string),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token encodes");

    ("Authorization".to_string(), format!("Bearer {}", token))
}

/// The news routes wired to `store` the way main.rs wires them to Postgres,
/// next to the routes that need no database.
pub fn app(
    store: MemoryStore,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody<Error = Box<dyn std::error::Error>>>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let shared = Arc::new(store);
    let comments = CommentService::new(
        shared.clone(),
        shared.clone(),
        FixedOffset::east_opt(2 * 3600).expect("valid offset"),
    );
    let posts = PostService::new(shared, ContentRewriter::new(SITE_URL));

    App::new()
        .app_data(web::Data::new(comments))
        .app_data(web::Data::new(posts))
        .route("/metrics", web::get().to(news_service::metrics::serve_metrics))
        .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
        .configure(handlers::configure(Arc::new(JwtVerifier::hs256(TEST_SECRET))))
}
