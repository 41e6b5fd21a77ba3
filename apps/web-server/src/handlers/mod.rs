//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;


use actix_web::{
    HttpMessage, HttpRequest, HttpResponse, error::InternalError, http::StatusCode, web,
};

use yatube_shared::ErrorResponse;

use crate::middleware::error::error_page;
use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Ids that match `\d+` but overflow i64 still get the error page.
    cfg.app_data(web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), "Unparseable path segment: {}", err);
        let request_id = req.extensions().get::<RequestId>().cloned();
        InternalError::from_response(err, not_found_page(req, request_id)).into()
    }));

    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_list))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route(r"/posts/{post_id:\d+}/", web::get().to(posts::post_detail))
        .service(
            web::resource(r"/posts/{post_id:\d+}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::post_create_form))
                .route(web::post().to(posts::post_create)),
        )
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .service(
                    web::resource("/logout/")
                        .route(web::get().to(auth::logout))
                        .route(web::post().to(auth::logout)),
                )
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                ),
        )
        .route("/health/", web::get().to(health::health_check))
        .default_service(web::to(not_found));
}

/// Fallback for every path no route matches.
async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    tracing::debug!(path = %req.path(), "No route matched");
    not_found_page(&req, Some(request_id))
}

fn not_found_page(req: &HttpRequest, request_id: Option<RequestId>) -> HttpResponse {
    let mut problem = ErrorResponse::not_found(format!("{} does not exist", req.path()));
    if let Some(id) = request_id {
        problem = problem.with_request_id(id.as_str());
    }
    error_page(StatusCode::NOT_FOUND, problem)
}
