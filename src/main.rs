use actix_web::{App, HttpServer, middleware, web};

use community_site::config::AppConfig;
use community_site::handlers;
use community_site::models::submission::SubmissionArchive;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();

    // Ensure data directory exists
    std::fs::create_dir_all(config.submissions_dir())?;
    let archive = web::Data::new(SubmissionArchive::new(config.submissions_dir()));

    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(config.clone())
            .app_data(archive.clone())
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
