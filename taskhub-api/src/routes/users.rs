/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users/register` - Create an account
/// - `POST /api/users/login` - Exchange credentials for a bearer token
/// - `GET /api/users/profile` - Fetch the caller's profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskhub_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token, valid for 7 days
    pub token: String,
}

/// Register a new user
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    // A duplicate email trips the unique constraint and surfaces as 409
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login and obtain a bearer token
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// can't be used to enumerate registered addresses.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse { token }))
}

/// Fetch the caller's profile
///
/// The password hash is excluded from serialization at the model level.
pub async fn profile(CurrentUser(user): CurrentUser) -> ApiResult<Json<User>> {
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "password123".to_string(),
            name: "Alice".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            name: "Alice".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
            name: "Alice".to_string(),
        };
        assert!(short_password.validate().is_err());

        let empty_name = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "password123".to_string(),
            name: String::new(),
        };
        assert!(empty_name.validate().is_err());
    }
}
