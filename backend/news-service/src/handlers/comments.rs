/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::CommentTreeNode;
use crate::services::comments::COMMENT_PUBLISHED_MESSAGE;
use crate::services::{CommentService, CreateCommentRequest, SubmissionContext};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub message: &'static str,
    pub redirect_to: String,
    pub comment: CommentTreeNode,
}

/// Publish a comment on an article
///
/// Anonymous callers get 403 whatever the body holds.
pub async fn store_comment(
    req: HttpRequest,
    user: CurrentUser,
    service: web::Data<CommentService>,
    body: std::result::Result<web::Json<CreateCommentRequest>, actix_web::Error>,
) -> Result<HttpResponse> {
    let request = match body {
        Ok(body) => body.into_inner(),
        Err(err) if user.is_authenticated() => {
            return Err(AppError::BadRequest(err.to_string()));
        }
        Err(_) => CreateCommentRequest::default(),
    };

    let context = SubmissionContext::now(
        client_ip(&req),
        req.headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    );

    let comment = service.submit(user.user(), request, context).await?;
    let redirect_to = format!("/posts/{}", comment.article_id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, redirect_to.clone()))
        .json(CommentCreatedResponse {
            message: COMMENT_PUBLISHED_MESSAGE,
            redirect_to,
            comment: CommentTreeNode::new(&comment, Vec::new()),
        }))
}

/// Caller address, honouring `Forwarded`/`X-Forwarded-For` from the proxy in
/// front of the service. The port is dropped.
fn client_ip(req: &HttpRequest) -> Option<String> {
    let info = req.connection_info();
    let raw = info.realip_remote_addr()?;

    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Some(addr.ip().to_string());
    }
    if let Ok(ip) = raw.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
        return Some(ip.to_string());
    }
    Some(raw.to_string())
}
