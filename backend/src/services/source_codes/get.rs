use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ServiceError;
use crate::AppState;

use super::form;

/// Public detail view: fetches a record by id regardless of owner, joined
/// with the submitter's username. Absence here is plain "not found", since
/// no ownership is involved.
pub async fn process(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let id = form::parse_id(&id)?;

    match state.repo.find_by_id(id)? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "status": "error",
            "message": "Source code not found.",
        }))),
    }
}
