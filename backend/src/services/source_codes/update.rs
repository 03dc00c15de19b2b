use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::warn;
use serde_json::json;

use crate::auth::Owner;
use crate::error::ServiceError;
use crate::repository::SourceCodeRepository;
use crate::storage::FileStore;
use crate::AppState;

use super::form::{self, SubmissionForm};

pub async fn process(
    owner: Owner,
    payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let submission = form::parse(payload).await?;
    update_source_code(&state.repo, &state.store, owner.0, &submission).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Source code successfully updated!",
    })))
}

/// Validates an update submission, resolves the file disposition, and
/// persists the changed record.
///
/// When a new file is uploaded, the old one is deleted only after the new
/// one is confirmed stored; an upload failure therefore aborts before any
/// deletion, and the record never ends up pointing at a missing file. The
/// deletions themselves are best-effort and not transactional with the
/// database write.
pub async fn update_source_code(
    repo: &SourceCodeRepository,
    store: &FileStore,
    owner_id: i64,
    submission: &SubmissionForm,
) -> Result<(), ServiceError> {
    let id = form::parse_id(&submission.id)?;
    let fields = form::validate_fields(submission)?;

    let existing = repo
        .find_by_id_for_owner(id, owner_id)?
        .ok_or(ServiceError::NotFoundOrForbidden)?;

    let file_path = if let Some(upload) = &submission.upload {
        let new_ref = store.store(owner_id, upload)?;
        if let Some(old) = &existing.file_path {
            if let Err(e) = store.delete(old) {
                warn!("could not delete replaced file {}: {}", old, e);
            }
        }
        Some(new_ref)
    } else if submission.remove_file {
        if let Some(old) = &existing.file_path {
            if let Err(e) = store.delete(old) {
                warn!("could not delete removed file {}: {}", old, e);
            }
        }
        None
    } else {
        existing.file_path.clone()
    };

    if !repo.update(id, owner_id, &fields.into_input(file_path))? {
        return Err(ServiceError::NotFoundOrForbidden);
    }
    Ok(())
}
