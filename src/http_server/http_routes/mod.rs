use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    response::Response,
};
use axum_extra::extract::Form;
use serde::de::DeserializeOwned;

use crate::error::BookingError;
use crate::http_server::{error::not_found_response, outcome::Mutation};

pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

/// Numeric `{id}` path segment. Anything else is answered with the not-found page.
pub struct RecordId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                log::debug!("Rejected record id in {}: {}", parts.uri.path(), rejection);
                Err(not_found_response())
            }
        }
    }
}

/// Url-encoded form body. A body that cannot be read is answered with a failed
/// [`Mutation`] instead of axum's plain-text rejection.
pub struct SubmittedForm<T>(pub T);

impl<T, S> FromRequest<S> for SubmittedForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Mutation;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Self(value)),
            Err(rejection) => Err(Mutation::failed(
                BookingError::Validation(rejection.to_string()),
                "The submitted form could not be read!".to_string(),
            )),
        }
    }
}
