use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::UserSnapshot;

/// Extracts the authenticated user's snapshot from request extensions.
///
/// Intended for routes guarded by `AuthMiddleware`, which verifies the token
/// and inserts the snapshot it carried. If the snapshot is absent the
/// middleware did not run for this route; the request is refused.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserSnapshot);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<UserSnapshot>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                let err = AppError::Forbidden("Not authorized".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
