use actix_web::{web, HttpResponse};
use common::requests::DeleteSourceCodeRequest;
use log::warn;
use serde_json::json;

use crate::auth::Owner;
use crate::error::ServiceError;
use crate::repository::SourceCodeRepository;
use crate::storage::FileStore;
use crate::AppState;

use super::form;

pub async fn process(
    owner: Owner,
    request: web::Form<DeleteSourceCodeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    delete_source_code(&state.repo, &state.store, owner.0, &request.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Source code successfully deleted!",
    })))
}

/// Deletes an owned record together with its stored file. The file removal
/// is idempotent and best-effort; the record is removed regardless.
pub async fn delete_source_code(
    repo: &SourceCodeRepository,
    store: &FileStore,
    owner_id: i64,
    raw_id: &str,
) -> Result<(), ServiceError> {
    let id = form::parse_id(raw_id)?;

    let existing = repo
        .find_by_id_for_owner(id, owner_id)?
        .ok_or(ServiceError::NotFoundOrForbidden)?;

    if let Some(path) = &existing.file_path {
        if let Err(e) = store.delete(path) {
            warn!("could not delete file {} for record {}: {}", path, id, e);
        }
    }

    if !repo.delete(id, owner_id)? {
        return Err(ServiceError::NotFoundOrForbidden);
    }
    Ok(())
}
