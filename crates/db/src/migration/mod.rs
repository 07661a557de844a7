//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the schema
//! builder, so the same steps run on Postgres and on the SQLite test database.

pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_auth_tables;
mod m20261018_000002_create_analytics_tables;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_auth_tables::Migration),
            Box::new(m20261018_000002_create_analytics_tables::Migration),
        ]
    }
}
