use serde::{Deserialize, Serialize};

/// Claims carried by a Bookshelf access token.
///
/// `sub` holds the user id the token was issued for; `iat`/`exp` are Unix
/// timestamps. `exp` is validated by `jsonwebtoken` on decode.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessClaims {
    pub(crate) sub: String,
    pub(crate) iat: usize,
    pub(crate) exp: usize,
}
