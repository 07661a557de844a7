//! Shared setup for repository integration tests.
//!
//! Tests run against an in-memory SQLite database by default. Set
//! `TEST_DATABASE_URL` to run them against Postgres instead.

#![allow(dead_code)]

use eventi_db::migration::{Migrator, MigratorTrait};
use eventi_db::{EnvironmentRepository, ProjectRepository, UserRepository};
use eventi_db::repositories::NewUser;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// Get database URL from environment or use an in-memory database.
fn get_database_url() -> String {
    std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

/// Connects and runs all migrations.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new(get_database_url());
    // An in-memory SQLite database lives and dies with its connection.
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Returns an email address unique to this run.
pub fn unique_email(label: &str) -> String {
    format!("{label}-{}@example.com", Uuid::new_v4())
}

/// Creates a user with a unique email.
pub async fn create_user(db: &DatabaseConnection) -> Uuid {
    UserRepository::new(db.clone())
        .create(NewUser {
            email: unique_email("user"),
            name: Some("Test User".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create test user")
        .id
}

/// Creates a user, a project and a `production` environment.
///
/// Returns `(user_id, project_id, environment_id)`.
pub async fn create_environment(db: &DatabaseConnection) -> (Uuid, Uuid, Uuid) {
    let user_id = create_user(db).await;
    let project = ProjectRepository::new(db.clone())
        .create(user_id, "Landing Page", "landing-page")
        .await
        .expect("Failed to create test project");
    let environment = EnvironmentRepository::new(db.clone())
        .create(project.id, "production")
        .await
        .expect("Failed to create test environment");

    (user_id, project.id, environment.id)
}
