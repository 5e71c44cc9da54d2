use crate::controller::health_check_controller;
use crate::controller::{book_controller, session_controller};
use crate::{params, sse, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::services::ServeDir;

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Bookshelf API"
        ),
        paths(
            book_controller::create,
            book_controller::index,
            book_controller::read,
            book_controller::update,
            book_controller::partial_update,
            book_controller::delete,
            session_controller::login,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::books::Model,
                domain::user::Credentials,
                domain::jwt::Jwt,
                params::book::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "bookshelf", description = "Book catalog and real-time notification API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(book_routes(app_state.clone()))
        .merge(health_routes())
        .merge(session_routes(app_state.clone()))
        .merge(stream_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
}

fn book_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/books", post(book_controller::create))
        .route("/books", get(book_controller::index))
        .route("/books/:id", get(book_controller::read))
        .route("/books/:id", put(book_controller::update))
        .route("/books/:id", patch(book_controller::partial_update))
        .route("/books/:id", delete(book_controller::delete))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(session_controller::login))
        .with_state(app_state)
}

fn stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/stream", get(sse::handler::stream_events))
        .with_state(app_state)
}

// This will serve static files that we can use as a "fallback" for when the server panics
pub fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./"))
}
