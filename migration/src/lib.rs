pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_schema;
mod m20250810_000002_create_users_and_books_tables;
mod m20250810_000003_add_initial_operator_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_schema::Migration),
            Box::new(m20250810_000002_create_users_and_books_tables::Migration),
            Box::new(m20250810_000003_add_initial_operator_user::Migration),
        ]
    }
}
