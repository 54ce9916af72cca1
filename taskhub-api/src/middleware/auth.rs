/// Authentication gate
///
/// The single enforcement point for identity: every protected route passes
/// through [`require_auth`], which extracts the bearer token, validates it,
/// loads the corresponding user, and attaches a typed [`CurrentUser`] to the
/// request. Handlers receive it through the extractor, so the identity is
/// threaded explicitly through handler signatures rather than looked up
/// ambiently.
///
/// Resource-level authorization (ownership checks) is deliberately NOT done
/// here; each controller re-derives the ownership chain per call.
///
/// A missing header, an invalid or expired token, and a token whose user no
/// longer exists all produce the same 401.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use taskhub_shared::{auth::jwt, models::user::User};

/// The authenticated caller, attached to the request by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Bearer-token authentication middleware
///
/// Verifies the `Authorization: Bearer <token>` header, resolves the token
/// to a live user row, and injects [`CurrentUser`] into request extensions.
///
/// # Errors
///
/// `401 Unauthorized` when the header is absent, the token fails
/// verification, or the referenced user no longer exists.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid authentication".to_string()))?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
