//! SQLite access and schema setup.
//!
//! Connections are opened per operation against a fixed database path, so
//! request handling shares no in-process database state. The schema is
//! created on startup with `CREATE TABLE IF NOT EXISTS`, making repeated
//! initialization harmless.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Database {
        Database {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens a fresh connection to the database file.
    pub fn conn(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }

    /// Creates the schema if it does not exist yet.
    pub fn init_schema(&self) -> rusqlite::Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS source_codes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                language TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                code_content TEXT NOT NULL,
                file_path TEXT,
                visibility TEXT NOT NULL DEFAULT 'public',
                tags TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id),
                FOREIGN KEY (category_id) REFERENCES categories (id)
            )",
            [],
        )?;

        Ok(())
    }
}
