use serde::Serialize;
use utoipa::ToSchema;

/// Represents an issued access token.
/// Note: This struct does not have a corresponding entity in the database.
///
/// - `access_token`: the encoded JWT string.
/// - `token_type`: always "bearer"; present so clients can construct the
///   Authorization header without guessing.
#[derive(Serialize, Debug, ToSchema)]
#[schema(as = jwt::Jwt)] // OpenAPI schema
pub struct Jwt {
    pub access_token: String,
    pub token_type: String,
}
