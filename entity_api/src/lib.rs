pub use entity::{books, users, Id};

pub mod book;
pub mod error;
pub mod mutate;
pub mod user;
