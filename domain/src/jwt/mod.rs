//! Issuance and validation of access tokens.
//!
//! Tokens are HS256 JWTs signed with the configured secret. A token is
//! issued at login and must accompany every subsequent request as an
//! `Authorization: Bearer` header; the web layer calls
//! [`verify_access_token`] to turn the header back into a user id.

use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::users;
use crate::Id;
use chrono::{Duration, Utc};
use claims::AccessClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use service::config::Config;

// re-export the Jwt struct from the entity module
pub use entity::jwt::Jwt;

pub(crate) mod claims;

/// Issues a time-bound access token for an authenticated user.
pub fn generate_access_token(config: &Config, user: &users::Model) -> Result<Jwt, Error> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.access_token_expiry_minutes as i64);

    let claims = AccessClaims {
        sub: user.id.to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.token_secret().as_bytes()),
    )?;

    Ok(Jwt {
        access_token: token,
        token_type: "bearer".to_string(),
    })
}

/// Validates a bearer token and returns the user id it was issued for.
/// Expired, tampered, or malformed tokens all surface as an authentication
/// error that the web layer maps to 401.
pub fn verify_access_token(config: &Config, token: &str) -> Result<Id, Error> {
    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.token_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::Unauthenticated,
        )),
    })?;

    Id::parse_str(&token_data.claims.sub).map_err(|err| Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::Unauthenticated,
        )),
    })
}
