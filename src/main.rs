use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod attendance;
mod auth;
mod config;
mod db;
mod directory;
mod docs;
mod model;
mod models;
mod routes;
mod utils;

use attendance::AttendanceTracker;
use attendance::clock::SystemClock;
use attendance::mysql::MySqlRecordStore;
use config::Config;
use db::init_db;
use directory::{MySqlUserDirectory, UserDirectory};

use crate::docs::ApiDoc;
use crate::utils::role_cache;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Interior Ops attendance service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "attendance.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level: tracing::Level = config
        .log_level
        .parse()
        .with_context(|| format!("LOG_LEVEL has an invalid value: {:?}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;

    let store = MySqlRecordStore::new(pool.clone());
    store.init_schema().await?;

    let tracker = Data::new(AttendanceTracker::new(
        Arc::new(store),
        Arc::new(SystemClock),
    ));
    let directory: Arc<dyn UserDirectory> = Arc::new(MySqlUserDirectory::new(pool.clone()));
    let directory = Data::from(directory);

    role_cache::init(config.role_cache_ttl_secs);

    let pool_for_cache_warmup = pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = role_cache::warmup_role_cache(&pool_for_cache_warmup, 250).await {
            warn!(error = %e, "Failed to warm up role cache");
        }
    });

    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(tracker.clone())
            .app_data(directory.clone())
            .service(index)
            // Attendance routes behind auth + rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
