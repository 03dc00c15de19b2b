//! Request-scoped owner identity.
//!
//! Authentication itself is handled by the fronting proxy, which sets the
//! `X-User-Id` header on every request it lets through. The extractor turns
//! that header into an explicit `Owner` value passed into each handler, so
//! no ambient session state exists anywhere in the service.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest};

/// Identity header expected from the authenticating front proxy.
pub const OWNER_HEADER: &str = "X-User-Id";

/// The authenticated owner of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub i64);

impl FromRequest for Owner {
    type Error = actix_web::Error;
    type Future = Ready<Result<Owner, actix_web::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let owner = req
            .headers()
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0);

        ready(match owner {
            Some(id) => Ok(Owner(id)),
            None => Err(ErrorUnauthorized("You must log in to access this page.")),
        })
    }
}
