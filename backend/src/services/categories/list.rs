use actix_web::{web, HttpResponse};

use crate::error::ServiceError;
use crate::AppState;

pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let categories = state.repo.list_categories()?;
    Ok(HttpResponse::Ok().json(categories))
}
