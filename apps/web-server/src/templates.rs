//! Askama page templates and the context each one renders.

use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use askama::Template;

use yatube_core::Page;
use yatube_core::domain::{Group, PostEntry, User};
use yatube_core::forms::{FieldKind, PostForm};

use crate::middleware::error::{AppError, AppResult};

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate {
    pub page_obj: Page<PostEntry>,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListTemplate {
    pub group: Group,
    pub page_obj: Page<PostEntry>,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate {
    pub author: User,
    pub post_count: u64,
    pub page_obj: Page<PostEntry>,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate {
    pub post: PostEntry,
    pub author_post_count: u64,
    pub can_edit: bool,
}

/// Shared by the create and edit views.
#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct PostFormTemplate {
    pub form: PostForm,
    pub is_edit: bool,
    pub action: String,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub next: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub username: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "core/error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: String,
    pub detail: Option<String>,
    pub request_id: Option<String>,
}

/// Renders `template` as a 200 HTML response.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    render_with_status(template, StatusCode::OK)
}

pub fn render_with_status<T: Template>(template: &T, status: StatusCode) -> AppResult<HttpResponse> {
    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))?;

    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html))
}
