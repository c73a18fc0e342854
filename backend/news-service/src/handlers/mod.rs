/// HTTP handlers for news-service
///
/// This module contains handlers for:
/// - Comments: publishing a reader comment on an article
/// - Posts: the article page with its comment tree
/// - Health: liveness and readiness probes
pub mod comments;
pub mod health;
pub mod posts;

// Re-export handler functions at module level
pub use comments::store_comment;
pub use health::{health_summary, liveness_check, readiness_summary, HealthState};
pub use posts::show_post;

use crate::middleware::{IdentityMiddleware, JwtVerifier};
use actix_web::web;
use std::sync::Arc;

/// Largest accepted JSON body.
const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Register the public news routes.
///
/// Only these resolve the caller's identity; health and metrics routes
/// registered next to them ignore `Authorization`.
pub fn configure(verifier: Arc<JwtVerifier>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .service(
                web::resource("/comments")
                    .route(web::post().to(store_comment))
                    .wrap(IdentityMiddleware::new(verifier.clone())),
            )
            .service(
                web::resource("/posts/{id_or_slug}")
                    .route(web::get().to(show_post))
                    .wrap(IdentityMiddleware::new(verifier)),
            );
    }
}
