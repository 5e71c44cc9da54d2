use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::users;
use log::*;
use service::AppState;

pub(crate) struct AuthenticatedUser(pub users::Model);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = RejectionType;

    // Extracts the bearer token from the Authorization header, verifies it and
    // loads the user it was issued for. Any failure along the way is reported
    // as a plain 401 so the response never leaks whether the token was absent,
    // expired, tampered with, or issued for a user that no longer exists.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthorized)?;

        let token = parse_bearer_token(header).ok_or_else(unauthorized)?;

        let user_id = domain::jwt::verify_access_token(&state.config, token).map_err(|err| {
            warn!("Rejected access token: {err:?}");
            unauthorized()
        })?;

        let user = domain::user::find_by_id(state.db_conn_ref(), user_id)
            .await
            .map_err(|err| {
                warn!("Token verified but user {user_id} could not be loaded: {err:?}");
                unauthorized()
            })?;

        Ok(AuthenticatedUser(user))
    }
}

fn unauthorized() -> RejectionType {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}

/// Splits `Bearer <token>` into the bare token, rejecting other schemes.
fn parse_bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_bearer_header() {
        assert_eq!(parse_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer_token("bearer abc"), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_malformed_headers() {
        assert_eq!(parse_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer_token("Bearer "), None);
        assert_eq!(parse_bearer_token("abc.def.ghi"), None);
    }
}
