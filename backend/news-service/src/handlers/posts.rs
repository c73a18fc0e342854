/// Post handlers - the public article page
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::PostService;
use actix_web::{web, HttpResponse};

/// Get a published article by id or slug with sidebars and comments
pub async fn show_post(
    id_or_slug: web::Path<String>,
    user: CurrentUser,
    service: web::Data<PostService>,
) -> Result<HttpResponse> {
    let page = service
        .show(&id_or_slug, user.is_authenticated())
        .await?;

    Ok(HttpResponse::Ok().json(page))
}
