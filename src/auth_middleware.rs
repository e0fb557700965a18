use anyhow::{Context, anyhow};
use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
};
use axum_extra::{TypedHeader, headers, typed_header::TypedHeaderRejectionReason};
use http::request::Parts;
use hyper::header;

use crate::{error::ApiError, services::auth::verify_token, state::AppState};

/// The authenticated caller. Extracting this fails with a 401 before
/// the handler body runs, which is what keeps "unauthenticated"
/// distinct from every other failure.
#[derive(Debug)]
pub struct LoggedInUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for LoggedInUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let cookies = parts
            .extract::<TypedHeader<headers::Cookie>>()
            .await
            .map_err(|e| match *e.name() {
                header::COOKIE => match e.reason() {
                    TypedHeaderRejectionReason::Missing => {
                        ApiError::NoAuth("no cookies".to_owned())
                    }
                    _ => ApiError::UnexpectedError(anyhow!("error getting cookies")),
                },
                _ => ApiError::UnexpectedError(anyhow!("error getting cookies")),
            })?;

        let auth_cookie = cookies
            .get("auth")
            .ok_or(ApiError::NoAuth("no cookie".to_owned()))?;

        let token = verify_token(&state.config.secret, auth_cookie)
            .map_err(|_| ApiError::NoAuth("invalid token".to_owned()))?;

        // the token only names a session, the row decides whether it
        // is still valid
        let session = state
            .data
            .sessions
            .get_one(&token.user_id, &token.session_id)
            .await
            .context("error getting session")?
            .ok_or(ApiError::NoAuth("no session".to_string()))?;

        return Ok(LoggedInUser {
            id: session.user_id,
        });
    }
}
