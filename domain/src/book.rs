//! Book operations.
//!
//! Each mutation persists through `entity_api` and then publishes a
//! [`BookEvent`] describing what changed. Publication happens after the
//! write commits, so subscribers never hear about a mutation that failed.

use crate::books::{self, Model};
use crate::error::Error;
use crate::Id;
use entity_api::mutate::{self, IntoUpdateMap};
use entity_api::book;
use events::{BookEvent, EventPublisher};
use sea_orm::{DatabaseConnection, IntoActiveModel};

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    book_model: Model,
) -> Result<Model, Error> {
    let created = book::create(db, book_model).await?;

    publisher
        .publish(BookEvent::Created {
            id: created.id,
            title: created.title.clone(),
        })
        .await;

    Ok(created)
}

pub async fn find_all(db: &DatabaseConnection, skip: u64, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(book::find_all(db, skip, limit).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Ok(book::find_by_id(db, id).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    book_model: Model,
) -> Result<Model, Error> {
    let updated = book::update(db, id, book_model).await?;

    publisher
        .publish(BookEvent::Updated {
            id: updated.id,
            title: updated.title.clone(),
        })
        .await;

    Ok(updated)
}

/// Applies only the fields present in `params`, leaving the rest untouched.
pub async fn partial_update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let existing = book::find_by_id(db, id).await?;

    let mut update_map = params.into_update_map();
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(now.into()));

    let updated = mutate::update::<books::ActiveModel, books::Column>(
        db,
        existing.into_active_model(),
        update_map,
    )
    .await?;

    publisher
        .publish(BookEvent::PartiallyUpdated {
            id: updated.id,
            title: updated.title.clone(),
        })
        .await;

    Ok(updated)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    id: Id,
) -> Result<(), Error> {
    let deleted = book::delete_by_id(db, id).await?;

    publisher
        .publish(BookEvent::Deleted {
            id: deleted.id,
            title: deleted.title,
        })
        .await;

    Ok(())
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::{Arc, Mutex};

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &BookEvent) {
            self.seen.lock().unwrap().push(event.to_string());
        }
    }

    fn recording_publisher() -> (EventPublisher, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let publisher = EventPublisher::new().with_handler(recorder.clone());
        (publisher, recorder)
    }

    fn a_book() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            title: "Dune".to_owned(),
            author: "Frank Herbert".to_owned(),
            published_date: chrono::NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            summary: "Desert planet politics".to_owned(),
            genre: "Science Fiction".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_publishes_a_created_event() -> Result<(), Error> {
        let book_model = a_book();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![book_model.clone()]])
            .into_connection();
        let (publisher, recorder) = recording_publisher();

        create(&db, &publisher, book_model).await?;

        assert_eq!(
            recorder.seen.lock().unwrap().as_slice(),
            ["Book created: Dune"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_publishes_a_deleted_event_with_the_title() -> Result<(), Error> {
        let book_model = a_book();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![book_model.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let (publisher, recorder) = recording_publisher();

        delete(&db, &publisher, book_model.id).await?;

        assert_eq!(
            recorder.seen.lock().unwrap().as_slice(),
            ["Book deleted: Dune"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_publishes_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();
        let (publisher, recorder) = recording_publisher();

        let result = delete(&db, &publisher, Id::new_v4()).await;

        assert!(result.is_err());
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}
