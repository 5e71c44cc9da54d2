use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::book::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use domain::{book as BookApi, books::Model, Id};
use log::*;

/// POST create a new Book
#[utoipa::path(
    post,
    path = "/books",
    request_body = domain::books::Model,
    responses(
        (status = 201, description = "Successfully Created a New Book", body = [domain::books::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(book_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Book from: {book_model:?}");

    let book = BookApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        book_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), book)))
}

/// GET all Books, paged with skip/limit
#[utoipa::path(
    get,
    path = "/books",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved all Books", body = [domain::books::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Books");
    debug!("Page Params: {params:?}");

    let books =
        BookApi::find_all(app_state.db_conn_ref(), params.skip(), params.limit()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), books)))
}

/// GET a particular Book specified by its id.
#[utoipa::path(
    get,
    path = "/books/{id}",
    params(
        ("id" = String, Path, description = "Book id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Book by its id", body = [domain::books::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Book by id: {id}");

    let book = BookApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), book)))
}

/// PUT replace every client-writable field of a Book
#[utoipa::path(
    put,
    path = "/books/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of book to update"),
    ),
    request_body = domain::books::Model,
    responses(
        (status = 200, description = "Successfully Updated Book", body = [domain::books::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(book_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Book with id: {id}");

    let book = BookApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        book_model,
    )
    .await?;

    debug!("Updated Book: {book:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), book)))
}

/// PATCH apply only the fields present in the request body
#[utoipa::path(
    patch,
    path = "/books/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of book to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Book", body = [domain::books::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn partial_update(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH Update Book with id: {id}");

    let book = BookApi::partial_update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        params,
    )
    .await?;

    debug!("Updated Book: {book:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), book)))
}

/// DELETE a Book specified by its primary key.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(
        ("id" = String, Path, description = "Book id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Book by its id", body = [String]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Book by id: {id}");

    BookApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
    )
    .await?;

    Ok(Json(json!({"id": id})))
}
