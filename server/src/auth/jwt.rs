//! Session Token Generation and Validation
//!
//! Session tokens are HS256-signed JWTs minted by the sign-in callback once the
//! identity provider has vouched for the user. Besides the subject they carry
//! the role and profile claims, so a stateless resolver can rebuild the session
//! without touching the database.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kd_common::{Role, Session};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::TokenError;

/// JWT claims of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Role at issuance time.
    pub role: Role,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Rebuild the session carried by these claims.
    pub fn into_session(self) -> Result<Session, TokenError> {
        let user_id: Uuid = self.sub.parse().map_err(|_| TokenError::Invalid)?;

        Ok(Session {
            user_id,
            role: self.role,
            name: self.name,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// Issue a session token for `session`.
///
/// # Arguments
/// * `session` - Session whose identity and claims are embedded
/// * `secret` - HS256 signing secret
/// * `expiry_seconds` - Token validity (typically 2592000 = 30 days)
pub fn issue_session_token(
    session: &Session,
    secret: &str,
    expiry_seconds: i64,
) -> Result<String, TokenError> {
    let now = Utc::now();
    let exp = Duration::try_seconds(expiry_seconds)
        .and_then(|validity| now.checked_add_signed(validity))
        .ok_or(TokenError::ExpiryOutOfRange(expiry_seconds))?;

    let claims = Claims {
        sub: session.user_id.to_string(),
        role: session.role,
        name: session.name.clone(),
        email: session.email.clone(),
        phone: session.phone.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validate and decode a session token.
///
/// Returns an error if the signature does not match or the token is expired.
pub fn validate_session_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    Ok(token_data.claims)
}
