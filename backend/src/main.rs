mod auth;
mod config;
mod db;
mod error;
mod repository;
mod services;
mod storage;

use std::fs;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::config::Config;
use crate::db::Database;
use crate::repository::SourceCodeRepository;
use crate::storage::FileStore;

/// Shared application state injected into every handler.
pub struct AppState {
    pub repo: SourceCodeRepository,
    pub store: FileStore,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let database = Database::new(&config.database_path);
    database
        .init_schema()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("schema init failed: {}", e)))?;
    fs::create_dir_all(&config.upload_root)?;

    let store = FileStore::new(&config.upload_root);
    info!(
        "Server running at http://{}:{} (db: {}, uploads: {})",
        config.host,
        config.port,
        config.database_path.display(),
        store.root().display()
    );

    let state = web::Data::new(AppState {
        repo: SourceCodeRepository::new(database),
        store,
    });

    let upload_root = config.upload_root.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(services::source_codes::configure_routes())
            .service(services::categories::configure_routes())
            // Stored uploads are served straight from the storage root under
            // the same prefix the persisted references use.
            .service(Files::new("/uploads", upload_root.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
