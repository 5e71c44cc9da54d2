//! Business layer for Bookshelf.
//!
//! Re-exports the pieces of `entity_api` that upper layers need so that the
//! `web` crate only ever depends on `domain`, keeping layer boundaries
//! intact: `web` -> `domain` -> `entity_api` -> `entity`.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    Id,
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{books, users};

pub mod book;
pub mod error;
pub mod jwt;
pub mod user;
