use actix_web::{web, HttpResponse};

use crate::auth::Owner;
use crate::error::ServiceError;
use crate::AppState;

/// Lists the authenticated owner's records, ordered by id.
pub async fn process(
    owner: Owner,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let codes = state.repo.list_by_owner(owner.0)?;
    Ok(HttpResponse::Ok().json(codes))
}
