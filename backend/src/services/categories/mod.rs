//! Category listing for the submission form.

mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/categories";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(list::process))
}
