/// Bearer token generation and validation
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256), carrying the user id as
/// the subject. They are stateless: there is no server-side session store,
/// so a token is valid until it expires (7 days).
///
/// Every validation failure (bad signature, expiry, malformed token, wrong
/// issuer) is surfaced to API clients as the same 401. The distinction only
/// exists internally for logging.
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim value
const ISSUER: &str = "taskhub";

/// Token lifetime: 7 days
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: Subject (user id)
/// - `iss`: Issuer (always "taskhub")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates new claims with the default 7-day expiration
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts its claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired,
/// the issuer doesn't match, or the token is malformed.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskhub");
        assert!(!claims.is_expired());
        assert_eq!(
            claims.exp - claims.iat,
            Duration::days(TOKEN_TTL_DAYS).num_seconds()
        );
    }

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        let token = create_token(&claims, SECRET).unwrap();
        let validated = validate_token(&token, SECRET).unwrap();

        assert_eq!(validated.sub, user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4());
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, "a-completely-different-secret-key").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::days(-1));
        let token = create_token(&claims, SECRET).unwrap();

        match validate_token(&token, SECRET) {
            Err(JwtError::Expired) => {}
            other => panic!("expected Expired, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let claims = Claims::new(Uuid::new_v4());
        let mut token = create_token(&claims, SECRET).unwrap();
        token.push('x');

        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(validate_token("not.a.jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
