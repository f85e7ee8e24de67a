use actix_multipart::form::MultipartFormConfig;
use actix_web::{HttpResponse, web};

pub mod cfp_handlers;

pub const SUBMIT_PATH: &str = "/api/cfp";

/// Upper bound for one multipart submission, image included.
const MAX_SUBMISSION_BYTES: usize = 6 * 1024 * 1024;

/// Register the public site routes. Expects `web::Data<AppConfig>` and
/// `web::Data<SubmissionArchive>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_SUBMISSION_BYTES)
            .memory_limit(MAX_SUBMISSION_BYTES),
    )
    .route("/", web::get().to(|| async {
        HttpResponse::SeeOther()
            .insert_header(("Location", "/cfp"))
            .finish()
    }))
    .route("/cfp", web::get().to(cfp_handlers::page))
    .route(SUBMIT_PATH, web::post().to(cfp_handlers::submit));
}

/// Default 404 handler (must be registered last)
pub async fn not_found() -> HttpResponse {
    let html = include_str!("../../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
