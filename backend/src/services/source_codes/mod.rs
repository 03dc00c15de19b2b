//! # Source Code Service Module
//!
//! This module aggregates all API endpoints for managing source code
//! records. It acts as a router, directing requests under the
//! `/api/source_codes` path to the handler logic in its sub-modules.
//!
//! ## Sub-modules:
//! - `form`: multipart form intake, validation and normalization.
//! - `create`: submits a new record, storing an attached file if present.
//! - `update`: edits an owned record, replacing, removing or keeping its file.
//! - `delete`: removes an owned record together with its stored file.
//! - `get`: public detail view joined with the submitter's username.
//! - `list`: the authenticated owner's own records.

pub mod form;

mod create;
mod delete;
mod get;
mod list;
mod update;

#[cfg(test)]
mod tests;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all source code API endpoints.
const API_PATH: &str = "/api/source_codes";

/// Configures and returns the Actix `Scope` for source code routes.
///
/// # Registered Routes:
///
/// *   **`POST /create`**: multipart submission of a new record
///     (title, description, language, category_id, code_content,
///     visibility, tags, optional file_upload).
/// *   **`POST /update`**: multipart edit of an owned record; same fields
///     plus `id` and the optional `remove_file` flag.
/// *   **`POST /delete`**: form-encoded removal of an owned record by `id`.
/// *   **`GET /mine`**: the authenticated owner's records as JSON.
/// *   **`GET /{id}`**: public detail view of a single record.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/create", post().to(create::process))
        .route("/update", post().to(update::process))
        .route("/delete", post().to(delete::process))
        .route("/mine", get().to(list::process))
        .route("/{id}", get().to(get::process))
}

pub use create::create_source_code;
pub use delete::delete_source_code;
pub use update::update_source_code;
