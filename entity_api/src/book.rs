use super::error::{EntityApiErrorKind, Error};
use entity::books::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, QuerySelect, TryIntoModel,
};

use log::*;

pub async fn create(db: &DatabaseConnection, book_model: Model) -> Result<Model, Error> {
    debug!("New Book Model to be inserted: {book_model:?}");

    let now = chrono::Utc::now();

    let book_active_model: ActiveModel = ActiveModel {
        title: Set(book_model.title),
        author: Set(book_model.author),
        published_date: Set(book_model.published_date),
        summary: Set(book_model.summary),
        genre: Set(book_model.genre),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(book_active_model.save(db).await?.try_into_model()?)
}

/// Pages through books in insertion order.
pub async fn find_all(db: &DatabaseConnection, skip: u64, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Full replace of every client-writable column.
pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(book) => {
            debug!("Existing Book model to be Updated: {book:?}");

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(book.id),
                title: Set(model.title),
                author: Set(model.author),
                published_date: Set(model.published_date),
                summary: Set(model.summary),
                genre: Set(model.genre),
                created_at: Unchanged(book.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => {
            debug!("Book with id {id} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

/// Deletes a book and returns the deleted row so callers can still describe
/// it (e.g. in a mutation event) after it is gone.
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let book = find_by_id(db, id).await?;

    book.clone().delete(db).await?;
    Ok(book)
}
