use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use std::time::Duration;

mod api;
mod auth;
mod client;
mod clock;
mod config;
mod dashboard;
mod docs;
mod export;
mod model;
mod models;
mod routes;
mod stats;
mod utils;

use client::{AttendanceBackend, HttpBackend};
use clock::LiveClock;
use config::Config;
use utils::session_store::SessionStore;

use crate::docs::ApiDoc;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

fn startup_error(e: anyhow::Error) -> std::io::Error {
    error!(error = %format!("{e:#}"), "Startup failed");
    eprintln!("Startup failed: {e:#}");
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let config = Config::from_env().map_err(startup_error)?;

    let backend: Arc<dyn AttendanceBackend> = Arc::new(
        HttpBackend::new(&config.backend_url, config.backend_timeout).map_err(startup_error)?,
    );
    let backend = Data::from(backend);

    let sessions = Data::new(SessionStore::new(
        Duration::from_secs(config.access_token_ttl as u64),
        Duration::from_secs(config.refresh_token_ttl as u64),
    ));

    let clock = LiveClock::new(config.zone);
    clock.spawn_ticker();
    let clock = Data::new(clock);

    info!(
        backend = %config.backend_url,
        zone = %config.zone,
        prefix = %config.api_prefix,
        "Configuration loaded"
    );

    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(backend.clone())
            .app_data(sessions.clone())
            .app_data(clock.clone())
            .app_data(config_data.clone())
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
