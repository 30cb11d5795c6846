use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod error;
mod models;
mod ordering;
mod signals;

use config::Config;
use db::Database;
use signals::WindowSignals;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub signals: Arc<WindowSignals>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("Using database: {}", config.database_url);

    let db = Database::new(&config.database_url, config.db_pool_size, &config.default_house)
        .map_err(|e| std::io::Error::other(format!("Failed to initialize database: {}", e)))?;

    let state = web::Data::new(AppState {
        db: Arc::new(db),
        config: config.clone(),
        signals: Arc::new(WindowSignals::new()),
    });

    log::info!("Starting organizer backend on {}:{}", config.bind_address, config.port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure_all)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
