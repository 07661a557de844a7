//! Database seeder for Eventi development and testing.
//!
//! Seeds a development user with one project, `development` and `production`
//! environments, an API key per environment, and a handful of events.
//! Running it again leaves existing rows alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use eventi_db::entities::{environments, projects, users};
use eventi_db::repositories::{NewEvent, NewUser};
use eventi_db::{
    ApiKeyRepository, EnvironmentRepository, EventRepository, ProjectRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

const DEV_EMAIL: &str = "dev@eventi.local";
const PROJECT_SLUG: &str = "demo-site";
const ENVIRONMENTS: &[&str] = &["development", "production"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = eventi_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding development user...");
    let user = seed_user(&db).await?;

    println!("Seeding demo project...");
    let project = seed_project(&db, &user).await?;

    for name in ENVIRONMENTS {
        println!("Seeding environment '{name}'...");
        let environment = seed_environment(&db, &project, name).await?;
        seed_api_key(&db, &environment).await?;
        seed_events(&db, &environment).await?;
    }

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the development user.
async fn seed_user(db: &DatabaseConnection) -> anyhow::Result<users::Model> {
    let repo = UserRepository::new(db.clone());

    if let Some(user) = repo.find_by_email(DEV_EMAIL).await? {
        println!("  User already exists, skipping...");
        return Ok(user);
    }

    let user = repo
        .create(NewUser {
            email: DEV_EMAIL.to_string(),
            name: Some("Dev User".to_string()),
            image: None,
            email_verified: Some(Utc::now()),
        })
        .await?;
    println!("  Created user {}", user.id);
    Ok(user)
}

/// Seeds the demo project.
async fn seed_project(
    db: &DatabaseConnection,
    user: &users::Model,
) -> anyhow::Result<projects::Model> {
    let repo = ProjectRepository::new(db.clone());

    if let Some(project) = repo.find_by_slug(user.id, PROJECT_SLUG).await? {
        println!("  Project already exists, skipping...");
        return Ok(project);
    }

    Ok(repo.create(user.id, "Demo Site", PROJECT_SLUG).await?)
}

/// Seeds one environment of the demo project.
async fn seed_environment(
    db: &DatabaseConnection,
    project: &projects::Model,
    name: &str,
) -> anyhow::Result<environments::Model> {
    let repo = EnvironmentRepository::new(db.clone());

    if let Some(environment) = repo.find_by_name(project.id, name).await? {
        println!("  Environment already exists, skipping...");
        return Ok(environment);
    }

    Ok(repo.create(project.id, name).await?)
}

/// Seeds an API key and prints it; the plaintext is not recoverable later.
async fn seed_api_key(
    db: &DatabaseConnection,
    environment: &environments::Model,
) -> anyhow::Result<()> {
    let repo = ApiKeyRepository::new(db.clone());

    if !repo.list_for_environment(environment.id).await?.is_empty() {
        println!("  API key already exists, skipping...");
        return Ok(());
    }

    let created = repo.create(environment.id, "seed").await?;
    println!("  API key: {}", created.plaintext);
    Ok(())
}

/// Seeds a day of sample events.
async fn seed_events(
    db: &DatabaseConnection,
    environment: &environments::Model,
) -> anyhow::Result<()> {
    let repo = EventRepository::new(db.clone());
    let now = Utc::now();

    if repo
        .count_in_range(environment.id, now - Duration::days(1), now)
        .await?
        > 0
    {
        println!("  Events already exist, skipping...");
        return Ok(());
    }

    let samples = [
        ("page_view", json!({ "path": "/" })),
        ("page_view", json!({ "path": "/pricing" })),
        ("signup_click", json!({ "plan": "pro" })),
        ("signup_complete", json!({ "plan": "pro", "seats": 3 })),
    ];

    let count = samples.len();
    for (hours_ago, (name, payload)) in (1_i64..).zip(samples) {
        repo.record(NewEvent {
            environment_id: environment.id,
            event_name: name.to_string(),
            payload: Some(payload),
            url: Some("https://demo.example.com/".to_string()),
            timestamp: Some(now - Duration::hours(hours_ago)),
            ..Default::default()
        })
        .await?;
    }

    println!("  Recorded {count} events");
    Ok(())
}
