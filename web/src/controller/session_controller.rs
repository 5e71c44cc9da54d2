use crate::controller::ApiResponse;
use crate::{AppState, Error};
use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, Form, Json};
use domain::user::Credentials;
use domain::{jwt as JwtApi, user as UserApi};
use log::*;

/// Logs the user into the platform and returns a bearer access token.
///
/// The token must accompany every subsequent API call, e.g.:
/// curl -v --header "Authorization: Bearer <access_token>" --request GET http://localhost:8000/books
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = domain::user::Credentials, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logs in and returns a bearer access token", body = [domain::jwt::Jwt]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Form(creds): Form<Credentials>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Login for: {:?}", creds.email);

    let user = UserApi::authenticate(app_state.db_conn_ref(), creds).await?;
    let jwt = JwtApi::generate_access_token(&app_state.config, &user)?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), jwt)))
}
