//! Event repository.
//!
//! Events are written once per tracked client action and read back per
//! environment over a time range, which the
//! `events_environment_timestamp_idx` index serves.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::error::{RepositoryError, WriteResultExt};
use crate::entities::events;

/// Input for recording an event.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    /// Owning environment.
    pub environment_id: Uuid,
    /// Event name, e.g. `signup_click`.
    pub event_name: String,
    /// Arbitrary JSON payload.
    pub payload: Option<serde_json::Value>,
    /// Page URL.
    pub url: Option<String>,
    /// Referrer URL.
    pub referrer: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Client IP address.
    pub ip: Option<String>,
    /// Event time; defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Event repository.
#[derive(Debug, Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    /// Creates a new event repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingParent` if the environment does not
    /// exist.
    pub async fn record(&self, input: NewEvent) -> Result<events::Model, RepositoryError> {
        events::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_name: Set(input.event_name),
            payload: Set(input.payload),
            url: Set(input.url),
            referrer: Set(input.referrer),
            user_agent: Set(input.user_agent),
            ip: Set(input.ip),
            environment_id: Set(input.environment_id),
            timestamp: Set(input.timestamp.unwrap_or_else(Utc::now).into()),
        }
        .insert(&self.db)
        .await
        .classify("event", "environment")
    }

    /// Lists an environment's events in `[from, to)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_in_range(
        &self,
        environment_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<events::Model>, DbErr> {
        events::Entity::find()
            .filter(events::Column::EnvironmentId.eq(environment_id))
            .filter(events::Column::Timestamp.gte(from))
            .filter(events::Column::Timestamp.lt(to))
            .order_by_asc(events::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Counts an environment's events in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_in_range(
        &self,
        environment_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        events::Entity::find()
            .filter(events::Column::EnvironmentId.eq(environment_id))
            .filter(events::Column::Timestamp.gte(from))
            .filter(events::Column::Timestamp.lt(to))
            .count(&self.db)
            .await
    }

    /// Deletes an environment's events older than `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_before(
        &self,
        environment_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = events::Entity::delete_many()
            .filter(events::Column::EnvironmentId.eq(environment_id))
            .filter(events::Column::Timestamp.lt(cutoff))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
