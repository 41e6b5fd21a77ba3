//! Post pages: the three feeds, post detail, create and edit.

use actix_web::{HttpResponse, http::header, web};

use yatube_core::DomainError;
use yatube_core::services::Submission;
use yatube_shared::dto::{PageQuery, PostFormData};

use crate::middleware::auth::{Identity, OptionalIdentity, removal_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates::{
    GroupListTemplate, IndexTemplate, PostDetailTemplate, PostFormTemplate, ProfileTemplate,
    render,
};
use crate::urls;

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page_obj = state.posts.index(query.page.as_deref()).await?;
    render(&IndexTemplate { page_obj })
}

/// GET /group/{slug}/
pub async fn group_list(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.posts.group_feed(&slug, query.page.as_deref()).await?;
    render(&GroupListTemplate {
        group: feed.group,
        page_obj: feed.page,
    })
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.posts.profile(&username, query.page.as_deref()).await?;
    render(&ProfileTemplate {
        author: feed.author,
        post_count: feed.post_count,
        page_obj: feed.page,
    })
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let detail = state.posts.post_detail(post_id.into_inner()).await?;
    let can_edit = viewer
        .user_id()
        .is_some_and(|user_id| detail.entry.is_authored_by(user_id));

    render(&PostDetailTemplate {
        post: detail.entry,
        author_post_count: detail.author_post_count,
        can_edit,
    })
}

/// GET /create/
pub async fn post_create_form(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let form = state.posts.create_form().await?;
    render(&PostFormTemplate {
        form,
        is_edit: false,
        action: urls::POST_CREATE.to_string(),
    })
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    match state
        .posts
        .create_post(identity.user_id, &form.text, &form.group)
        .await
    {
        Ok(Submission::Saved(_)) => Ok(redirect(&urls::profile(&identity.username))),
        Ok(Submission::Invalid(form)) => render(&PostFormTemplate {
            form,
            is_edit: false,
            action: urls::POST_CREATE.to_string(),
        }),
        // Stale session: drop it and log in again.
        Err(DomainError::Unauthorized) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, urls::login_with_next(urls::POST_CREATE)))
            .cookie(removal_cookie())
            .finish()),
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();

    match state.posts.edit_form(identity.user_id, post_id).await {
        Ok(form) => render(&PostFormTemplate {
            form,
            is_edit: true,
            action: urls::post_edit(post_id),
        }),
        Err(DomainError::Forbidden) => Ok(redirect(&urls::post_detail(post_id))),
        Err(e) => Err(e.into()),
    }
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();

    match state
        .posts
        .edit_post(identity.user_id, post_id, &form.text, &form.group)
        .await
    {
        Ok(Submission::Saved(_)) => Ok(redirect(&urls::post_detail(post_id))),
        Ok(Submission::Invalid(form)) => render(&PostFormTemplate {
            form,
            is_edit: true,
            action: urls::post_edit(post_id),
        }),
        Err(DomainError::Forbidden) => Ok(redirect(&urls::post_detail(post_id))),
        Err(e) => Err(e.into()),
    }
}

/// 302 to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
