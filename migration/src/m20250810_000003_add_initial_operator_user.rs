use chrono::Utc;
use password_auth::generate_hash;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DbBackend, Statement, Value};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        insert_initial_operator_user(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        delete_initial_operator_user(manager).await
    }
}

// NOTE: We use raw SQL here to avoid issues with entity type changes in future migrations.
// Using the ORM can break if new fields are added later, but raw SQL remains compatible.
async fn insert_initial_operator_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let now = Utc::now();

    let password_hash = generate_hash("admin123");

    let user_sql = r#"
        INSERT INTO bookshelf.users (
            email, password, created_at, updated_at
        ) VALUES ($1, $2, $3, $4)
    "#;
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        user_sql,
        vec![
            Value::String(Some(Box::new("admin@bookshelf.dev".to_owned()))),
            Value::String(Some(Box::new(password_hash))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
            Value::ChronoDateTimeUtc(Some(Box::new(now))),
        ],
    ))
    .await?;

    Ok(())
}

async fn delete_initial_operator_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();

    let delete_user_sql = r#"
        DELETE FROM bookshelf.users WHERE email = $1
    "#;
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        delete_user_sql,
        vec![Value::String(Some(Box::new("admin@bookshelf.dev".to_owned())))],
    ))
    .await?;

    Ok(())
}
