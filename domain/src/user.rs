use crate::error::Error;
use crate::users::Model;
use sea_orm::DatabaseConnection;

pub use entity_api::user::{find_by_email, find_by_id, Credentials};

/// Checks credentials against the stored operator identity.
///
/// An unknown email and a wrong password both come back as the same
/// authentication error so the response does not leak which one it was.
pub async fn authenticate(db: &DatabaseConnection, creds: Credentials) -> Result<Model, Error> {
    let user = entity_api::user::find_by_email(db, &creds.email)
        .await?
        .ok_or_else(Error::unauthenticated)?;

    entity_api::user::verify_password(&creds.password, &user.password).await?;

    Ok(user)
}
