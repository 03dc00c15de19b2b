use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
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
    let id = create_source_code(&state.repo, &state.store, owner.0, &submission).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Source code successfully submitted!",
        "id": id,
    })))
}

/// Validates a create submission, stores the attached file if present, and
/// persists the new record. A storage failure aborts before anything is
/// written to the database.
pub async fn create_source_code(
    repo: &SourceCodeRepository,
    store: &FileStore,
    owner_id: i64,
    submission: &SubmissionForm,
) -> Result<i64, ServiceError> {
    let fields = form::validate_fields(submission)?;

    let file_path = match &submission.upload {
        Some(upload) => Some(store.store(owner_id, upload)?),
        None => None,
    };

    let id = repo.create(owner_id, &fields.into_input(file_path))?;
    Ok(id)
}
