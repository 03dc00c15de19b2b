//! Server configuration read from the environment at startup.
//!
//! Every knob has a default suitable for a local deployment, so the server
//! runs with no environment at all:
//! - `CODEREPO_HOST` (default `127.0.0.1`)
//! - `CODEREPO_PORT` (default `8080`)
//! - `CODEREPO_DATABASE` (default `coderepo.sqlite`)
//! - `CODEREPO_UPLOADS` (default `uploads`)

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
    /// Root directory for stored uploads. Records reference files relative
    /// to this root, so it can be relocated without rewriting rows.
    pub upload_root: PathBuf,
}

impl Config {
    pub fn from_env() -> Config {
        let host = env::var("CODEREPO_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("CODEREPO_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let database_path = env::var("CODEREPO_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("coderepo.sqlite"));
        let upload_root = env::var("CODEREPO_UPLOADS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        Config {
            host,
            port,
            database_path,
            upload_root,
        }
    }
}
